use crate::error::{ImportError, Result};
use crate::font::{FontLoader, FontName, FontStyle};
use async_trait::async_trait;
use indexmap::IndexSet;
use std::sync::Mutex;

/// In-memory font loader backed by a fixed set of installed fonts.
///
/// Every load request is recorded, so callers can inspect which fallbacks
/// were attempted.
#[derive(Debug, Default)]
pub struct FontCatalog {
    available: IndexSet<FontName>,
    attempts: Mutex<Vec<FontName>>,
}

impl FontCatalog {
    /// Create an empty catalog; every load fails
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: install every style of `family`
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        let family = family.into();
        for style in FontStyle::ALL {
            self.available.insert(FontName::new(family.clone(), style));
        }
        self
    }

    /// Builder method: install a single font
    pub fn with_font(mut self, font: FontName) -> Self {
        self.available.insert(font);
        self
    }

    /// Whether `font` is installed
    pub fn contains(&self, font: &FontName) -> bool {
        self.available.contains(font)
    }

    /// Installed font count
    pub fn len(&self) -> usize {
        self.available.len()
    }

    /// Check if no font is installed
    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    /// Every load request made so far, in order
    pub fn attempts(&self) -> Vec<FontName> {
        match self.attempts.lock() {
            Ok(attempts) => attempts.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl FontLoader for FontCatalog {
    async fn load_font(&self, font: &FontName) -> Result<()> {
        match self.attempts.lock() {
            Ok(mut attempts) => attempts.push(font.clone()),
            Err(poisoned) => poisoned.into_inner().push(font.clone()),
        }

        if self.available.contains(font) {
            Ok(())
        } else {
            Err(ImportError::FontUnavailable(font.to_string()))
        }
    }
}

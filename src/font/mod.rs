//! Font resolution with an ordered fallback chain
//!
//! A text layer asks for `(family, weight)`. The resolver tries, in order:
//! 1. the family with the style that matches the weight
//! 2. the family in Regular
//! 3. the default family in Regular
//!
//! The first candidate that loads wins. When none loads the caller skips the
//! layer instead of failing the import.

pub mod catalog;

pub use catalog::FontCatalog;

use crate::error::{ImportError, Result};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Style names understood by the target design tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontStyle {
    Light,
    Regular,
    Medium,
    #[serde(rename = "Semi Bold")]
    SemiBold,
    Bold,
}

impl FontStyle {
    /// Every style, lightest first
    pub const ALL: [FontStyle; 5] = [
        FontStyle::Light,
        FontStyle::Regular,
        FontStyle::Medium,
        FontStyle::SemiBold,
        FontStyle::Bold,
    ];

    /// Map a CSS weight to a style name
    pub fn from_weight(weight: u16) -> Self {
        match weight {
            w if w >= 700 => FontStyle::Bold,
            w if w >= 600 => FontStyle::SemiBold,
            w if w >= 500 => FontStyle::Medium,
            w if w <= 300 => FontStyle::Light,
            _ => FontStyle::Regular,
        }
    }

    /// Style name as the design tool spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            FontStyle::Light => "Light",
            FontStyle::Regular => "Regular",
            FontStyle::Medium => "Medium",
            FontStyle::SemiBold => "Semi Bold",
            FontStyle::Bold => "Bold",
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A loadable `(family, style)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontName {
    pub family: String,
    pub style: FontStyle,
}

impl FontName {
    pub fn new(family: impl Into<String>, style: FontStyle) -> Self {
        Self {
            family: family.into(),
            style,
        }
    }
}

impl fmt::Display for FontName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.style)
    }
}

/// Loads fonts into the design tool so text nodes can use them
#[async_trait]
pub trait FontLoader: Send + Sync {
    /// Make `font` available; an error means this exact pair cannot be used
    async fn load_font(&self, font: &FontName) -> Result<()>;
}

#[async_trait]
impl<T: FontLoader + ?Sized> FontLoader for Arc<T> {
    async fn load_font(&self, font: &FontName) -> Result<()> {
        (**self).load_font(font).await
    }
}

/// Ordered, de-duplicated fallback candidates for a requested font
pub fn font_candidates(family: Option<&str>, weight: u16, default_family: &str) -> Vec<FontName> {
    let mut candidates = Vec::with_capacity(3);
    if let Some(family) = family.map(str::trim).filter(|f| !f.is_empty()) {
        candidates.push(FontName::new(family, FontStyle::from_weight(weight)));
        candidates.push(FontName::new(family, FontStyle::Regular));
    }
    candidates.push(FontName::new(default_family, FontStyle::Regular));

    let mut unique: Vec<FontName> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

/// Walks the fallback chain against a [`FontLoader`], remembering outcomes
/// so each pair is attempted at most once per import
pub struct FontResolver<L> {
    loader: L,
    default_family: String,
    outcomes: IndexMap<FontName, bool>,
}

impl<L: FontLoader> FontResolver<L> {
    /// Create a resolver whose last resort is `default_family` Regular
    pub fn new(loader: L, default_family: impl Into<String>) -> Self {
        Self {
            loader,
            default_family: default_family.into(),
            outcomes: IndexMap::new(),
        }
    }

    /// Get the underlying loader
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Fonts that loaded so far, in first-use order
    pub fn loaded(&self) -> impl Iterator<Item = &FontName> {
        self.outcomes.iter().filter(|(_, ok)| **ok).map(|(font, _)| font)
    }

    /// Resolve a family and weight to a loaded font.
    ///
    /// Candidates are tried strictly one after another. Returns
    /// `FontResolutionFailure` when the whole chain is exhausted.
    pub async fn resolve(&mut self, family: Option<&str>, weight: u16) -> Result<FontName> {
        for candidate in font_candidates(family, weight, &self.default_family) {
            if let Some(&ok) = self.outcomes.get(&candidate) {
                if ok {
                    return Ok(candidate);
                }
                continue;
            }

            match self.loader.load_font(&candidate).await {
                Ok(()) => {
                    self.outcomes.insert(candidate.clone(), true);
                    return Ok(candidate);
                }
                Err(e) => {
                    log::warn!("Font {} unavailable, trying next fallback: {}", candidate, e);
                    self.outcomes.insert(candidate, false);
                }
            }
        }

        Err(ImportError::FontResolutionFailure {
            family: family.unwrap_or(&self.default_family).to_string(),
            weight,
        })
    }
}

//! Tunables for both pipeline phases.
//!
//! Defaults match what the capture script and the import plugin ship with;
//! hosts that need different values can deserialize them from JSON.

use serde::{Deserialize, Serialize};

/// Options for turning a captured DOM into layer records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Root frame width when the root element measures zero
    pub default_width: f64,

    /// Root frame height when the root element measures zero
    pub default_height: f64,

    /// Root frame fill when the root element has no background
    pub default_background: String,

    /// Name given to the root frame
    pub root_name: String,

    /// Fill for image placeholders that have no background of their own
    pub image_placeholder: String,

    /// Maximum characters used when a layer name is derived from text
    pub max_name_len: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            default_width: 1440.0,
            default_height: 900.0,
            default_background: "#ffffff".to_string(),
            root_name: "Web Page".to_string(),
            image_placeholder: "#e5e5e5".to_string(),
            max_name_len: 40,
        }
    }
}

impl ExtractOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set fallback root size
    pub fn default_size(mut self, width: f64, height: f64) -> Self {
        self.default_width = width;
        self.default_height = height;
        self
    }

    /// Builder method: set root frame name
    pub fn root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }

    /// Builder method: set fallback root background
    pub fn default_background(mut self, color: impl Into<String>) -> Self {
        self.default_background = color.into();
        self
    }
}

/// Options for rebuilding layer records as scene nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Allowed root width as `(min, max)`
    pub root_width: (f64, f64),

    /// Allowed root height as `(min, max)`
    pub root_height: (f64, f64),

    /// Smallest width/height a non-root shape may have
    pub min_node_size: f64,

    /// Last family in the font fallback chain
    pub default_font: String,

    /// Name of the root frame when record 0 has none
    pub root_name: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            root_width: (100.0, 5000.0),
            root_height: (100.0, 10000.0),
            min_node_size: 1.0,
            default_font: "Inter".to_string(),
            root_name: "Imported Design".to_string(),
        }
    }
}

impl RenderOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the fallback font family
    pub fn default_font(mut self, family: impl Into<String>) -> Self {
        self.default_font = family.into();
        self
    }

    /// Clamp a root size into the configured ranges
    pub fn clamp_root(&self, width: f64, height: f64) -> (f64, f64) {
        (
            clamp_or_min(width, self.root_width),
            clamp_or_min(height, self.root_height),
        )
    }

    /// Raise a shape size to the configured minimum
    pub fn clamp_node(&self, size: f64) -> f64 {
        if size.is_finite() {
            size.max(self.min_node_size)
        } else {
            self.min_node_size
        }
    }
}

fn clamp_or_min(value: f64, (min, max): (f64, f64)) -> f64 {
    if value.is_finite() { value.clamp(min, max) } else { min }
}

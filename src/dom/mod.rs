//! DOM capture and extraction module
//!
//! This module turns a rendered page into layer records. It includes:
//! - ElementNode: snapshot of one element with its computed style and rect
//! - ComputedStyle: resolved CSS values and their numeric readings
//! - DomTree: a captured tree, read from a browser tab or from JSON
//! - Extractor: pre-order walk producing the flat layer sequence

pub mod element;
pub mod extract;
pub mod style;
pub mod tree;

pub use element::{BoundingBox, ElementNode};
pub use extract::{Extractor, extract};
pub use style::ComputedStyle;
pub use tree::DomTree;

use crate::config::ExtractOptions;
use crate::error::Result;
use crate::layer::LayerRecord;
use headless_chrome::Tab;
use std::sync::Arc;

/// Capture the subtree under `selector` from a browser tab
pub fn capture_dom(tab: &Arc<Tab>, selector: &str) -> Result<DomTree> {
    DomTree::from_tab(tab, selector)
}

/// Capture the subtree under `selector` and flatten it into layer records
pub fn capture_layers(tab: &Arc<Tab>, selector: &str, options: &ExtractOptions) -> Result<Vec<LayerRecord>> {
    DomTree::from_tab(tab, selector)?.extract_layers(options)
}

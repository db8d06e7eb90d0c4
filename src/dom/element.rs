use crate::dom::style::ComputedStyle;
use crate::error::{ImportError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tags that never paint anything; their subtrees are not walked
pub const NON_VISUAL_TAGS: [&str; 10] = [
    "script", "style", "link", "meta", "head", "title", "noscript", "template", "base", "source",
];

/// Tags captured as image placeholders
pub const IMAGE_TAGS: [&str; 2] = ["img", "svg"];

/// Snapshot of one rendered DOM element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementNode {
    /// HTML tag name (e.g., "div", "img", "svg")
    pub tag_name: String,

    /// Element attributes (e.g., id, class, alt)
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// The element's own text nodes, in order; descendants' text is not included
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text_nodes: Vec<String>,

    /// Resolved style; `None` when the browser could not report it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ComputedStyle>,

    /// Rendered rect in screen coordinates; `None` when it could not be measured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,

    /// Child elements
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementNode>,
}

/// Bounding box coordinates for an element
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ElementNode {
    /// Create a new ElementNode
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: HashMap::new(),
            text_nodes: Vec::new(),
            style: None,
            bounding_box: None,
            children: Vec::new(),
        }
    }

    /// Builder method: set attributes
    pub fn with_attributes(mut self, attributes: HashMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Builder method: append a direct text node
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_nodes.push(text.into());
        self
    }

    /// Builder method: set resolved style
    pub fn with_style(mut self, style: ComputedStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Builder method: set children
    pub fn with_children(mut self, children: Vec<ElementNode>) -> Self {
        self.children = children;
        self
    }

    /// Builder method: set bounding box
    pub fn with_bounding_box(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.bounding_box = Some(BoundingBox { x, y, width, height });
        self
    }

    /// Add a single attribute
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Add a child element
    pub fn add_child(&mut self, child: ElementNode) {
        self.children.push(child);
    }

    /// Get attribute value by key
    pub fn get_attribute(&self, key: &str) -> Option<&String> {
        self.attributes.get(key)
    }

    /// Get element ID
    pub fn id(&self) -> Option<&String> {
        self.attributes.get("id")
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    /// Whether the element belongs to the document's non-painting machinery
    pub fn is_non_visual(&self) -> bool {
        NON_VISUAL_TAGS.iter().any(|tag| self.is_tag(tag))
    }

    /// Whether the element is a raster image or inline vector graphic
    pub fn is_image(&self) -> bool {
        IMAGE_TAGS.iter().any(|tag| self.is_tag(tag))
    }

    /// Own text content: non-empty direct text nodes, trimmed and joined by a space
    pub fn direct_text(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .text_nodes
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// Resolved style, or an `ElementReadFailure` when it was not captured
    pub fn computed_style(&self) -> Result<&ComputedStyle> {
        self.style.as_ref().ok_or_else(|| {
            ImportError::ElementReadFailure(format!("<{}> has no computed style", self.tag_name))
        })
    }

    /// Rendered rect, or an `ElementReadFailure` when it was not measured or
    /// is not finite
    pub fn rect(&self) -> Result<BoundingBox> {
        match self.bounding_box {
            Some(rect) if rect.is_finite() => Ok(rect),
            Some(_) => Err(ImportError::ElementReadFailure(format!(
                "<{}> has a non-finite bounding box",
                self.tag_name
            ))),
            None => Err(ImportError::ElementReadFailure(format!(
                "<{}> has no bounding box",
                self.tag_name
            ))),
        }
    }

    /// Short label built from tag, id and first class (e.g. `div#hero.card`)
    pub fn label(&self) -> String {
        let mut label = self.tag_name.to_ascii_lowercase();
        if let Some(id) = self.id() {
            label.push('#');
            label.push_str(id);
        } else if let Some(class) = self
            .get_attribute("class")
            .and_then(|c| c.split_whitespace().next())
        {
            label.push('.');
            label.push_str(class);
        }
        label
    }
}

impl BoundingBox {
    /// Create a new BoundingBox
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Check if the bounding box is visible (has non-zero dimensions)
    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Whether every coordinate is a finite number
    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Translate into a coordinate space whose origin is `(origin_x, origin_y)`
    pub fn relative_to(&self, origin_x: f64, origin_y: f64) -> Self {
        Self {
            x: self.x - origin_x,
            y: self.y - origin_y,
            width: self.width,
            height: self.height,
        }
    }
}

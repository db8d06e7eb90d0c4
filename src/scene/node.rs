use crate::color::Rgb;
use crate::font::FontName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a node created on a [`SceneSurface`](crate::scene::SceneSurface)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node:{}", self.0)
    }
}

/// A point on the host canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Border paint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Rgb,
    pub weight: f64,
}

/// Top-level container that parents every imported shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameNode {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Option<Rgb>,
}

/// Filled/stroked box; also used for image placeholders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangleNode {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Option<Rgb>,
    pub stroke: Option<Stroke>,
    pub corner_radius: Option<f64>,
    pub opacity: Option<f64>,
}

/// Auto-sized text run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub characters: String,
    pub font: FontName,
    pub font_size: Option<f64>,
    pub fill: Option<Rgb>,
    pub opacity: Option<f64>,
}

/// Any node that can be appended under a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum SceneNode {
    Frame(FrameNode),
    Rectangle(RectangleNode),
    Text(TextNode),
}

impl SceneNode {
    /// Display name of the node
    pub fn name(&self) -> &str {
        match self {
            SceneNode::Frame(frame) => &frame.name,
            SceneNode::Rectangle(rect) => &rect.name,
            SceneNode::Text(text) => &text.name,
        }
    }

    /// Position of the node's top-left corner
    pub fn position(&self) -> Point {
        match self {
            SceneNode::Frame(frame) => Point::new(frame.x, frame.y),
            SceneNode::Rectangle(rect) => Point::new(rect.x, rect.y),
            SceneNode::Text(text) => Point::new(text.x, text.y),
        }
    }
}

/// A toast shown to the user once an operation ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub error: bool,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: true,
        }
    }
}

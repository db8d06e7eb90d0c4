//! Target scene graph: shape primitives and the host surface they are built on

pub mod canvas;
pub mod node;

pub use canvas::{Canvas, CanvasNode};
pub use node::{FrameNode, NodeId, Notice, Point, RectangleNode, SceneNode, Stroke, TextNode};

use crate::error::Result;

/// The design tool a layer sequence is rebuilt in.
///
/// Children are painted in the order they are appended, so callers must
/// append in paint order.
pub trait SceneSurface {
    /// Centre of the user's current viewport
    fn viewport_center(&self) -> Point;

    /// Create a detached top-level frame
    fn create_frame(&mut self, frame: FrameNode) -> Result<NodeId>;

    /// Create `node` as the last child of `parent`
    fn append_child(&mut self, parent: NodeId, node: SceneNode) -> Result<NodeId>;

    /// Put a detached frame onto the current page
    fn attach_to_page(&mut self, node: NodeId) -> Result<()>;

    /// Select `node` and scroll/zoom the viewport onto it
    fn select_and_focus(&mut self, node: NodeId) -> Result<()>;

    /// Show a notice to the user
    fn notify(&mut self, notice: Notice);

    /// Close the import UI
    fn close(&mut self) {}
}

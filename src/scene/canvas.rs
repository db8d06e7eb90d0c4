use crate::error::{ImportError, Result};
use crate::scene::node::{FrameNode, NodeId, Notice, Point, SceneNode};
use crate::scene::SceneSurface;
use serde::Serialize;

/// One node stored on a [`Canvas`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanvasNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub node: SceneNode,
}

/// In-memory [`SceneSurface`] that keeps every node in creation order.
///
/// Rejects geometry the design tool would refuse (non-finite numbers,
/// non-positive sizes, empty text) with `NodeCreationFailure`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Canvas {
    viewport_center: Point,
    nodes: Vec<CanvasNode>,
    page: Vec<NodeId>,
    selection: Vec<NodeId>,
    notices: Vec<Notice>,
    closed: bool,
}

impl Canvas {
    /// Create an empty canvas with the viewport centred on the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the viewport centre
    pub fn with_viewport_center(mut self, x: f64, y: f64) -> Self {
        self.viewport_center = Point::new(x, y);
        self
    }

    /// Look up a node
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0).map(|n| &n.node)
    }

    /// Every node, in creation order
    pub fn nodes(&self) -> &[CanvasNode] {
        &self.nodes
    }

    /// Children of `parent`, in paint order
    pub fn children_of(&self, parent: NodeId) -> Vec<&SceneNode> {
        self.nodes
            .iter()
            .filter(|n| n.parent == Some(parent))
            .map(|n| &n.node)
            .collect()
    }

    /// Top-level nodes attached to the page
    pub fn page(&self) -> &[NodeId] {
        &self.page
    }

    /// Current selection
    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    /// Notices shown so far
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Whether the import UI was closed
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Serialize the whole canvas to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn insert(&mut self, parent: Option<NodeId>, node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(CanvasNode { id, parent, node });
        id
    }

    fn require(&self, id: NodeId) -> Result<&SceneNode> {
        self.get(id)
            .ok_or_else(|| ImportError::NodeCreationFailure(format!("{} does not exist", id)))
    }
}

fn check_box(kind: &str, name: &str, values: [f64; 4]) -> Result<()> {
    let [x, y, width, height] = values;
    if !values.iter().all(|v| v.is_finite()) {
        return Err(ImportError::NodeCreationFailure(format!(
            "{} '{}' has non-finite geometry",
            kind, name
        )));
    }
    if width <= 0.0 || height <= 0.0 {
        return Err(ImportError::NodeCreationFailure(format!(
            "{} '{}' at ({}, {}) has empty size {}x{}",
            kind, name, x, y, width, height
        )));
    }
    Ok(())
}

fn validate(node: &SceneNode) -> Result<()> {
    match node {
        SceneNode::Frame(frame) => check_box(
            "frame",
            &frame.name,
            [frame.x, frame.y, frame.width, frame.height],
        ),
        SceneNode::Rectangle(rect) => {
            check_box("rectangle", &rect.name, [rect.x, rect.y, rect.width, rect.height])?;
            let optional = [rect.corner_radius, rect.opacity, rect.stroke.map(|s| s.weight)];
            if optional.into_iter().flatten().all(f64::is_finite) {
                Ok(())
            } else {
                Err(ImportError::NodeCreationFailure(format!(
                    "rectangle '{}' has a non-finite style value",
                    rect.name
                )))
            }
        }
        SceneNode::Text(text) => {
            if text.characters.is_empty() {
                return Err(ImportError::NodeCreationFailure(format!(
                    "text '{}' has no characters",
                    text.name
                )));
            }
            let numbers = [Some(text.x), Some(text.y), text.font_size, text.opacity];
            if numbers.into_iter().flatten().all(f64::is_finite) {
                Ok(())
            } else {
                Err(ImportError::NodeCreationFailure(format!(
                    "text '{}' has a non-finite value",
                    text.name
                )))
            }
        }
    }
}

impl SceneSurface for Canvas {
    fn viewport_center(&self) -> Point {
        self.viewport_center
    }

    fn create_frame(&mut self, frame: FrameNode) -> Result<NodeId> {
        let node = SceneNode::Frame(frame);
        validate(&node)?;
        Ok(self.insert(None, node))
    }

    fn append_child(&mut self, parent: NodeId, node: SceneNode) -> Result<NodeId> {
        if !matches!(self.require(parent)?, SceneNode::Frame(_)) {
            return Err(ImportError::NodeCreationFailure(format!(
                "{} cannot have children",
                parent
            )));
        }
        validate(&node)?;
        Ok(self.insert(Some(parent), node))
    }

    fn attach_to_page(&mut self, node: NodeId) -> Result<()> {
        self.require(node)?;
        if !self.page.contains(&node) {
            self.page.push(node);
        }
        Ok(())
    }

    fn select_and_focus(&mut self, node: NodeId) -> Result<()> {
        self.require(node)?;
        self.selection = vec![node];
        Ok(())
    }

    fn notify(&mut self, notice: Notice) {
        if notice.error {
            log::warn!("{}", notice.message);
        } else {
            log::info!("{}", notice.message);
        }
        self.notices.push(notice);
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::scene::node::RectangleNode;

    fn frame() -> FrameNode {
        FrameNode {
            name: "Root".into(),
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            fill: Some(Rgb::WHITE),
        }
    }

    fn rect(name: &str, width: f64) -> SceneNode {
        SceneNode::Rectangle(RectangleNode {
            name: name.into(),
            x: 0.0,
            y: 0.0,
            width,
            height: 10.0,
            fill: None,
            stroke: None,
            corner_radius: None,
            opacity: None,
        })
    }

    #[test]
    fn test_children_keep_append_order() {
        let mut canvas = Canvas::new();
        let root = canvas.create_frame(frame()).unwrap();
        canvas.append_child(root, rect("a", 1.0)).unwrap();
        canvas.append_child(root, rect("b", 1.0)).unwrap();
        canvas.append_child(root, rect("c", 1.0)).unwrap();

        let names: Vec<&str> = canvas.children_of(root).iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_rejects_bad_geometry() {
        let mut canvas = Canvas::new();
        let root = canvas.create_frame(frame()).unwrap();

        assert!(matches!(
            canvas.append_child(root, rect("zero", 0.0)),
            Err(ImportError::NodeCreationFailure(_))
        ));
        assert!(canvas.append_child(root, rect("nan", f64::NAN)).is_err());
        assert!(canvas.children_of(root).is_empty());
    }

    #[test]
    fn test_only_frames_have_children() {
        let mut canvas = Canvas::new();
        let root = canvas.create_frame(frame()).unwrap();
        let child = canvas.append_child(root, rect("leaf", 5.0)).unwrap();

        assert!(canvas.append_child(child, rect("nested", 5.0)).is_err());
        assert!(canvas.append_child(NodeId(99), rect("orphan", 5.0)).is_err());
    }

    #[test]
    fn test_attach_select_notify() {
        let mut canvas = Canvas::new().with_viewport_center(50.0, 60.0);
        let root = canvas.create_frame(frame()).unwrap();

        canvas.attach_to_page(root).unwrap();
        canvas.attach_to_page(root).unwrap();
        canvas.select_and_focus(root).unwrap();
        canvas.notify(Notice::info("done"));

        assert_eq!(canvas.viewport_center(), Point::new(50.0, 60.0));
        assert_eq!(canvas.page(), &[root]);
        assert_eq!(canvas.selection(), &[root]);
        assert_eq!(canvas.notices().len(), 1);
        assert!(canvas.select_and_focus(NodeId(7)).is_err());
    }

    #[test]
    fn test_to_json() {
        let mut canvas = Canvas::new();
        let root = canvas.create_frame(frame()).unwrap();
        canvas.append_child(root, rect("box", 3.0)).unwrap();

        let json = canvas.to_json().unwrap();
        assert!(json.contains("\"RECTANGLE\""));
        assert!(json.contains("\"box\""));
    }
}

use crate::config::ExtractOptions;
use crate::dom::element::ElementNode;
use crate::dom::extract::Extractor;
use crate::error::{ImportError, Result};
use crate::layer::LayerRecord;
use headless_chrome::Tab;
use std::sync::Arc;

/// A captured element tree, rooted at the capture container
#[derive(Debug, Clone)]
pub struct DomTree {
    /// Root element of the capture (usually `body`)
    pub root: ElementNode,
}

impl DomTree {
    /// Create a new DomTree
    pub fn new(root: ElementNode) -> Self {
        Self { root }
    }

    /// Capture the subtree under `selector` from a browser tab
    pub fn from_tab(tab: &Arc<Tab>, selector: &str) -> Result<Self> {
        // The script is a function expression; call it with the selector
        let selector_arg = serde_json::to_string(selector)?;
        let js_code = format!("({})({})", include_str!("capture_dom.js"), selector_arg);

        let result = tab
            .evaluate(&js_code, false)
            .map_err(|e| ImportError::CaptureFailed(format!("Failed to execute capture script: {}", e)))?;

        let json_value = result
            .value
            .ok_or_else(|| ImportError::CaptureFailed("No value returned from capture script".to_string()))?;

        // The script returns a JSON string, or null when the selector matched nothing
        let json_str: Option<String> = serde_json::from_value(json_value)
            .map_err(|e| ImportError::CaptureFailed(format!("Failed to get JSON string: {}", e)))?;
        let json_str = json_str
            .ok_or_else(|| ImportError::InvalidInput(format!("No element matches '{}'", selector)))?;

        Self::from_json(&json_str)
    }

    /// Parse a captured tree from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        let root: Option<ElementNode> = serde_json::from_str(json)
            .map_err(|e| ImportError::CaptureFailed(format!("Failed to parse DOM JSON: {}", e)))?;
        let root = root.ok_or_else(|| ImportError::InvalidInput("Captured tree is empty".to_string()))?;
        Ok(Self::new(root))
    }

    /// Convert the captured tree to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    /// Flatten the tree into layer records
    pub fn extract_layers(&self, options: &ExtractOptions) -> Result<Vec<LayerRecord>> {
        Extractor::new(options.clone()).extract(&self.root)
    }

    /// Count total elements in the tree
    pub fn count_elements(&self) -> usize {
        Self::count_elements_recursive(&self.root)
    }

    fn count_elements_recursive(node: &ElementNode) -> usize {
        1 + node.children.iter().map(Self::count_elements_recursive).sum::<usize>()
    }

    /// Count elements that were captured without style or rect
    pub fn count_unreadable(&self) -> usize {
        Self::count_unreadable_recursive(&self.root)
    }

    fn count_unreadable_recursive(node: &ElementNode) -> usize {
        let own = usize::from(node.style.is_none() || node.bounding_box.is_none());
        own + node.children.iter().map(Self::count_unreadable_recursive).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::style::ComputedStyle;
    use crate::layer::LayerKind;

    fn create_test_tree() -> ElementNode {
        let style = ComputedStyle::new().with("display", "block");

        let mut root = ElementNode::new("body")
            .with_style(style.clone())
            .with_bounding_box(0.0, 0.0, 1024.0, 768.0);

        let mut header = ElementNode::new("header")
            .with_style(style.clone().with("background-color", "rgb(20, 20, 20)"))
            .with_bounding_box(0.0, 0.0, 1024.0, 64.0);
        header.add_child(
            ElementNode::new("h1")
                .with_text("Title")
                .with_style(style.clone())
                .with_bounding_box(16.0, 16.0, 200.0, 32.0),
        );

        let mut main = ElementNode::new("main");
        main.add_child(ElementNode::new("p").with_text("No style captured"));

        root.add_child(header);
        root.add_child(main);
        root
    }

    #[test]
    fn test_dom_tree_creation() {
        let tree = DomTree::new(create_test_tree());

        assert_eq!(tree.root.tag_name, "body");
        assert_eq!(tree.root.children.len(), 2);
    }

    #[test]
    fn test_count_elements() {
        let tree = DomTree::new(create_test_tree());

        // body, header, h1, main, p
        assert_eq!(tree.count_elements(), 5);
        // main and p were captured without style/rect
        assert_eq!(tree.count_unreadable(), 2);
    }

    #[test]
    fn test_json_round_trip_and_extract() {
        let tree = DomTree::new(create_test_tree());
        let json = tree.to_json().unwrap();
        assert!(json.contains("\"tag_name\": \"header\""));

        let parsed = DomTree::from_json(&json).unwrap();
        let layers = parsed.extract_layers(&ExtractOptions::default()).unwrap();

        let kinds: Vec<LayerKind> = layers.iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![LayerKind::Frame, LayerKind::Rectangle, LayerKind::Text]);
    }

    #[test]
    fn test_from_json_rejects_null_and_garbage() {
        assert!(matches!(DomTree::from_json("null"), Err(ImportError::InvalidInput(_))));
        assert!(matches!(DomTree::from_json("[1, 2]"), Err(ImportError::CaptureFailed(_))));
    }
}

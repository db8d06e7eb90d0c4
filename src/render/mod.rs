//! Rebuilds a layer sequence as scene nodes
//!
//! Record 0 becomes the root frame; every later record becomes one child of
//! that frame, appended strictly in sequence order since append order is
//! paint order. A record that cannot be built is logged and skipped; only an
//! empty sequence aborts the import.

use crate::color::{Rgb, parse_color};
use crate::config::RenderOptions;
use crate::error::{ImportError, Result};
use crate::font::{FontLoader, FontResolver};
use crate::layer::{LayerKind, LayerRecord};
use crate::scene::{FrameNode, NodeId, Notice, Point, RectangleNode, SceneNode, SceneSurface, Stroke, TextNode};
use serde::{Deserialize, Serialize};

/// Outcome of a successful import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSummary {
    /// Root frame holding every created node
    pub root: NodeId,

    /// Non-root nodes created
    pub created: usize,

    /// Non-root records that produced no node
    pub skipped: usize,
}

impl RenderSummary {
    /// Message shown to the user when the import finishes
    pub fn message(&self) -> String {
        match self.created {
            1 => "Imported 1 element".to_string(),
            n => format!("Imported {} elements", n),
        }
    }
}

/// Turns layer records into nodes on a [`SceneSurface`]
pub struct Renderer<L> {
    options: RenderOptions,
    fonts: FontResolver<L>,
}

impl<L: FontLoader> Renderer<L> {
    /// Create a renderer that loads fonts through `loader`
    pub fn new(loader: L, options: RenderOptions) -> Self {
        let fonts = FontResolver::new(loader, options.default_font.clone());
        Self { options, fonts }
    }

    /// Get the options in use
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Get the font resolver
    pub fn fonts(&self) -> &FontResolver<L> {
        &self.fonts
    }

    /// Rebuild `records` on `surface`.
    ///
    /// Fails with `EmptyInput` before creating anything when `records` is
    /// empty. Otherwise creates the root frame, replays records 1..N one at a
    /// time (each fully finished, font loading included, before the next
    /// starts), attaches and selects the root, and shows a summary notice.
    pub async fn render<S: SceneSurface>(&mut self, surface: &mut S, records: &[LayerRecord]) -> Result<RenderSummary> {
        let Some((first, rest)) = records.split_first() else {
            surface.notify(Notice::error(ImportError::EmptyInput.to_string()));
            return Err(ImportError::EmptyInput);
        };

        let frame = self.root_frame(first, surface.viewport_center());
        let root = match surface.create_frame(frame) {
            Ok(root) => root,
            Err(e) => {
                surface.notify(Notice::error(format!("Import failed: {}", e)));
                return Err(e);
            }
        };

        let mut created = 0;
        for (index, record) in rest.iter().enumerate() {
            match self.render_record(surface, root, record).await {
                Ok(Some(_)) => created += 1,
                Ok(None) => log::debug!("Layer {} ({:?}) has nothing to draw", index + 1, record.kind),
                Err(e) => log::warn!("Skipping layer {} '{}': {}", index + 1, record.display_name(), e),
            }
        }

        let placed = surface.attach_to_page(root).and_then(|()| surface.select_and_focus(root));
        if let Err(e) = placed {
            surface.notify(Notice::error(format!("Import failed: {}", e)));
            return Err(e);
        }

        let summary = RenderSummary {
            root,
            created,
            skipped: rest.len() - created,
        };
        log::info!(
            "Rendered {} of {} layers ({} skipped)",
            summary.created,
            rest.len(),
            summary.skipped
        );
        surface.notify(Notice::info(summary.message()));
        Ok(summary)
    }

    fn root_frame(&self, record: &LayerRecord, center: Point) -> FrameNode {
        if record.kind != LayerKind::Frame {
            log::warn!("First layer is {:?}, using it as the root frame anyway", record.kind);
        }
        let record = record.clone().sanitized();
        let (width, height) = self.options.clamp_root(record.width, record.height);
        let name = if record.name.trim().is_empty() {
            self.options.root_name.clone()
        } else {
            record.name.clone()
        };

        FrameNode {
            name,
            x: (center.x - width / 2.0).round(),
            y: (center.y - height / 2.0).round(),
            width,
            height,
            fill: Some(parse_color(record.fill.as_deref()).unwrap_or(Rgb::WHITE)),
        }
    }

    async fn render_record<S: SceneSurface>(
        &mut self,
        surface: &mut S,
        root: NodeId,
        record: &LayerRecord,
    ) -> Result<Option<NodeId>> {
        let record = record.clone().sanitized();
        let node = match record.kind {
            LayerKind::Text => match self.text_node(&record).await? {
                Some(text) => SceneNode::Text(text),
                None => return Ok(None),
            },
            LayerKind::Rectangle | LayerKind::Image => SceneNode::Rectangle(self.rectangle_node(&record)),
            LayerKind::Frame | LayerKind::Unknown => return Ok(None),
        };

        surface.append_child(root, node).map(Some)
    }

    async fn text_node(&mut self, record: &LayerRecord) -> Result<Option<TextNode>> {
        let Some(characters) = record.text.as_deref().filter(|t| !t.trim().is_empty()) else {
            return Ok(None);
        };

        let font = self
            .fonts
            .resolve(record.font_family.as_deref(), record.weight())
            .await?;

        Ok(Some(TextNode {
            name: record.display_name(),
            x: record.x,
            y: record.y,
            characters: characters.to_string(),
            font,
            font_size: record.font_size,
            fill: parse_color(record.fill.as_deref()),
            opacity: record.opacity,
        }))
    }

    fn rectangle_node(&self, record: &LayerRecord) -> RectangleNode {
        let stroke = record.stroke_width.and_then(|weight| {
            parse_color(record.stroke_color.as_deref()).map(|color| Stroke { color, weight })
        });

        RectangleNode {
            name: record.display_name(),
            x: record.x,
            y: record.y,
            width: self.options.clamp_node(record.width),
            height: self.options.clamp_node(record.height),
            fill: parse_color(record.fill.as_deref()),
            stroke,
            corner_radius: record.corner_radius,
            opacity: record.opacity,
        }
    }
}

/// Render with default options
pub async fn render<S: SceneSurface, L: FontLoader>(
    surface: &mut S,
    loader: L,
    records: &[LayerRecord],
) -> Result<RenderSummary> {
    Renderer::new(loader, RenderOptions::default()).render(surface, records).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{FontCatalog, FontName, FontStyle};
    use crate::scene::Canvas;
    use std::sync::Arc;

    fn inter() -> FontCatalog {
        FontCatalog::new().with_family("Inter")
    }

    #[tokio::test]
    async fn test_empty_input() {
        let mut canvas = Canvas::new();
        let err = render(&mut canvas, inter(), &[]).await.unwrap_err();

        assert!(matches!(err, ImportError::EmptyInput));
        assert!(canvas.nodes().is_empty());
        assert_eq!(canvas.notices().len(), 1);
        assert!(canvas.notices()[0].error);
    }

    #[tokio::test]
    async fn test_frame_and_red_rectangle() {
        let records = vec![
            LayerRecord::frame(800.0, 600.0).with_fill("#ffffff"),
            LayerRecord::rectangle(10.0, 10.0, 100.0, 50.0).with_fill("rgba(255,0,0,1)"),
        ];
        let mut canvas = Canvas::new();
        let summary = render(&mut canvas, inter(), &records).await.unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(summary.skipped, 0);

        let Some(SceneNode::Frame(root)) = canvas.get(summary.root) else {
            panic!("root should be a frame");
        };
        assert_eq!((root.width, root.height), (800.0, 600.0));
        assert_eq!(root.fill, Some(Rgb::WHITE));

        let children = canvas.children_of(summary.root);
        assert_eq!(children.len(), 1);
        let SceneNode::Rectangle(rect) = children[0] else {
            panic!("child should be a rectangle");
        };
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (10.0, 10.0, 100.0, 50.0));
        assert_eq!(rect.fill, Some(Rgb::new(1.0, 0.0, 0.0)));

        assert_eq!(canvas.page(), &[summary.root]);
        assert_eq!(canvas.selection(), &[summary.root]);
        assert_eq!(canvas.notices().last().unwrap().message, "Imported 1 element");
    }

    #[tokio::test]
    async fn test_root_clamping_and_centering() {
        let records = vec![LayerRecord::frame(20000.0, 5.0)];
        let mut canvas = Canvas::new().with_viewport_center(1000.0, 500.0);
        let summary = render(&mut canvas, inter(), &records).await.unwrap();

        let Some(SceneNode::Frame(root)) = canvas.get(summary.root) else {
            panic!("root should be a frame");
        };
        assert_eq!((root.width, root.height), (5000.0, 100.0));
        assert_eq!((root.x, root.y), (-1500.0, 450.0));
        assert_eq!(root.name, "Imported Design");
        assert_eq!(summary.created, 0);
    }

    #[tokio::test]
    async fn test_small_shapes_raised_to_minimum() {
        let records = vec![
            LayerRecord::frame(300.0, 300.0),
            LayerRecord::rectangle(0.0, 0.0, 0.0, 0.2),
            LayerRecord::image(5.0, 5.0, -4.0, 10.0),
        ];
        let mut canvas = Canvas::new();
        let summary = render(&mut canvas, inter(), &records).await.unwrap();

        assert_eq!(summary.created, 2);
        for child in canvas.children_of(summary.root) {
            let SceneNode::Rectangle(rect) = child else {
                panic!("expected rectangle");
            };
            assert!(rect.width >= 1.0 && rect.height >= 1.0);
        }
    }

    #[tokio::test]
    async fn test_text_record() {
        let records = vec![
            LayerRecord::frame(300.0, 300.0),
            LayerRecord::text("Hello", 4.0, 8.0, 50.0, 20.0)
                .with_font("Inter", 600.0, 18.0)
                .with_fill("rgb(0, 0, 0)")
                .with_opacity(0.5),
        ];
        let mut canvas = Canvas::new();
        let summary = render(&mut canvas, inter(), &records).await.unwrap();
        assert_eq!(summary.created, 1);

        let children = canvas.children_of(summary.root);
        let SceneNode::Text(text) = children[0] else {
            panic!("expected text");
        };
        assert_eq!(text.characters, "Hello");
        assert_eq!(text.font, FontName::new("Inter", FontStyle::SemiBold));
        assert_eq!(text.font_size, Some(18.0));
        assert_eq!(text.fill, Some(Rgb::BLACK));
        assert_eq!(text.opacity, Some(0.5));
        assert_eq!((text.x, text.y), (4.0, 8.0));
    }

    #[tokio::test]
    async fn test_unresolvable_font_skips_only_that_record() {
        let records = vec![
            LayerRecord::frame(300.0, 300.0),
            LayerRecord::text("Fancy", 0.0, 0.0, 10.0, 10.0).with_font("Comic Neue", 750.0, 12.0),
            LayerRecord::rectangle(0.0, 0.0, 10.0, 10.0),
        ];
        let catalog = Arc::new(FontCatalog::new());
        let mut canvas = Canvas::new();
        let mut renderer = Renderer::new(catalog.clone(), RenderOptions::default());
        let summary = renderer.render(&mut canvas, &records).await.unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(
            catalog.attempts(),
            vec![
                FontName::new("Comic Neue", FontStyle::Bold),
                FontName::new("Comic Neue", FontStyle::Regular),
                FontName::new("Inter", FontStyle::Regular),
            ]
        );
    }

    #[tokio::test]
    async fn test_skips_unknown_and_empty_records() {
        let mut unknown = LayerRecord::rectangle(0.0, 0.0, 10.0, 10.0);
        unknown.kind = LayerKind::Unknown;
        let records = vec![
            LayerRecord::frame(300.0, 300.0),
            unknown,
            LayerRecord::text("   ", 0.0, 0.0, 10.0, 10.0),
            LayerRecord::frame(50.0, 50.0),
            LayerRecord::rectangle(0.0, 0.0, 10.0, 10.0).with_name("kept"),
        ];
        let mut canvas = Canvas::new();
        let summary = render(&mut canvas, inter(), &records).await.unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(summary.skipped, 3);
        assert_eq!(canvas.children_of(summary.root)[0].name(), "kept");
    }

    #[tokio::test]
    async fn test_creation_order_matches_sequence() {
        let mut records = vec![LayerRecord::frame(500.0, 500.0)];
        for i in 0..20 {
            let record = if i % 3 == 0 {
                LayerRecord::text(format!("t{}", i), 0.0, 0.0, 10.0, 10.0).with_name(format!("n{}", i))
            } else {
                LayerRecord::rectangle(i as f64, 0.0, 5.0, 5.0).with_name(format!("n{}", i))
            };
            records.push(record);
        }
        let mut canvas = Canvas::new();
        let summary = render(&mut canvas, inter(), &records).await.unwrap();

        assert_eq!(summary.created, 20);
        let names: Vec<&str> = canvas.children_of(summary.root).iter().map(|n| n.name()).collect();
        let expected: Vec<String> = (0..20).map(|i| format!("n{}", i)).collect();
        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn test_stroke_requires_parseable_color() {
        let records = vec![
            LayerRecord::frame(300.0, 300.0),
            LayerRecord::rectangle(0.0, 0.0, 10.0, 10.0).with_stroke("#000", 2.0).with_corner_radius(4.0),
            LayerRecord::rectangle(0.0, 0.0, 10.0, 10.0).with_stroke("nonsense", 2.0),
            LayerRecord::rectangle(0.0, 0.0, 10.0, 10.0).with_stroke("#000", 0.0),
        ];
        let mut canvas = Canvas::new();
        let summary = render(&mut canvas, inter(), &records).await.unwrap();

        let strokes: Vec<Option<Stroke>> = canvas
            .children_of(summary.root)
            .iter()
            .map(|n| match n {
                SceneNode::Rectangle(r) => r.stroke,
                _ => None,
            })
            .collect();
        assert_eq!(
            strokes,
            vec![Some(Stroke { color: Rgb::BLACK, weight: 2.0 }), None, None]
        );
        let children = canvas.children_of(summary.root);
        let SceneNode::Rectangle(first) = children[0] else {
            panic!("expected rectangle");
        };
        assert_eq!(first.corner_radius, Some(4.0));
    }

    /// Surface that refuses to create nodes with a given name
    struct Picky {
        inner: Canvas,
        reject: &'static str,
    }

    impl SceneSurface for Picky {
        fn viewport_center(&self) -> Point {
            self.inner.viewport_center()
        }
        fn create_frame(&mut self, frame: FrameNode) -> Result<NodeId> {
            self.inner.create_frame(frame)
        }
        fn append_child(&mut self, parent: NodeId, node: SceneNode) -> Result<NodeId> {
            if node.name() == self.reject {
                return Err(ImportError::NodeCreationFailure("rejected".into()));
            }
            self.inner.append_child(parent, node)
        }
        fn attach_to_page(&mut self, node: NodeId) -> Result<()> {
            self.inner.attach_to_page(node)
        }
        fn select_and_focus(&mut self, node: NodeId) -> Result<()> {
            self.inner.select_and_focus(node)
        }
        fn notify(&mut self, notice: Notice) {
            self.inner.notify(notice)
        }
    }

    #[tokio::test]
    async fn test_node_failure_does_not_abort() {
        let records = vec![
            LayerRecord::frame(300.0, 300.0),
            LayerRecord::rectangle(0.0, 0.0, 10.0, 10.0).with_name("a"),
            LayerRecord::rectangle(0.0, 0.0, 10.0, 10.0).with_name("bad"),
            LayerRecord::rectangle(0.0, 0.0, 10.0, 10.0).with_name("c"),
        ];
        let mut surface = Picky {
            inner: Canvas::new(),
            reject: "bad",
        };
        let summary = render(&mut surface, inter(), &records).await.unwrap();

        assert_eq!(summary.created, 2);
        let names: Vec<&str> = surface
            .inner
            .children_of(summary.root)
            .iter()
            .map(|n| n.name())
            .collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(summary.message(), "Imported 2 elements");
    }

    /// Surface whose current page refuses new frames
    struct LockedPage {
        inner: Canvas,
    }

    impl SceneSurface for LockedPage {
        fn viewport_center(&self) -> Point {
            self.inner.viewport_center()
        }
        fn create_frame(&mut self, frame: FrameNode) -> Result<NodeId> {
            self.inner.create_frame(frame)
        }
        fn append_child(&mut self, parent: NodeId, node: SceneNode) -> Result<NodeId> {
            self.inner.append_child(parent, node)
        }
        fn attach_to_page(&mut self, _node: NodeId) -> Result<()> {
            Err(ImportError::NodeCreationFailure("page locked".into()))
        }
        fn select_and_focus(&mut self, node: NodeId) -> Result<()> {
            self.inner.select_and_focus(node)
        }
        fn notify(&mut self, notice: Notice) {
            self.inner.notify(notice)
        }
    }

    #[tokio::test]
    async fn test_attach_failure_is_reported() {
        let records = vec![
            LayerRecord::frame(300.0, 300.0),
            LayerRecord::rectangle(0.0, 0.0, 10.0, 10.0),
        ];
        let mut surface = LockedPage { inner: Canvas::new() };
        let err = render(&mut surface, inter(), &records).await.unwrap_err();

        assert!(matches!(err, ImportError::NodeCreationFailure(_)));
        let notices = surface.inner.notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].error);
        assert!(notices[0].message.contains("page locked"));
        assert!(surface.inner.selection().is_empty());
    }

    #[tokio::test]
    async fn test_zero_font_size_and_full_opacity_are_dropped() {
        let mut text = LayerRecord::text("Plain", 0.0, 0.0, 40.0, 12.0).with_opacity(1.0);
        text.font_size = Some(0.0);
        let records = vec![
            LayerRecord::frame(300.0, 300.0),
            text,
            LayerRecord::rectangle(0.0, 0.0, 10.0, 10.0).with_opacity(1.0),
        ];
        let mut canvas = Canvas::new();
        let summary = render(&mut canvas, inter(), &records).await.unwrap();

        let children = canvas.children_of(summary.root);
        let SceneNode::Text(text) = children[0] else {
            panic!("expected text");
        };
        assert_eq!(text.font_size, None);
        assert_eq!(text.opacity, None);
        let SceneNode::Rectangle(rect) = children[1] else {
            panic!("expected rectangle");
        };
        assert_eq!(rect.opacity, None);
    }
}

use crate::color::is_transparent;
use crate::config::ExtractOptions;
use crate::dom::element::{BoundingBox, ElementNode};
use crate::dom::style::ComputedStyle;
use crate::error::{ImportError, Result};
use crate::layer::{LayerKind, LayerRecord};

/// Flattens a captured element tree into paint-ordered layer records
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

/// What a single element contributes before its children are walked
enum Visit {
    /// Not painted; the whole subtree is skipped
    Hidden,
    /// Zero or more records for this element; children are walked next
    Layers(Vec<LayerRecord>),
}

impl Extractor {
    /// Create an extractor with the given options
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Get the options in use
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Walk `root` in pre-order and return its layer sequence.
    ///
    /// Record 0 is always the synthesized root FRAME. Every other record is
    /// positioned relative to the root's own screen offset. Elements that cannot
    /// be read produce no record but do not stop the walk.
    pub fn extract(&self, root: &ElementNode) -> Result<Vec<LayerRecord>> {
        if root.tag_name.trim().is_empty() {
            return Err(ImportError::InvalidInput(
                "capture root has no tag name".to_string(),
            ));
        }
        if root.is_non_visual() {
            return Err(ImportError::InvalidInput(format!(
                "<{}> cannot be used as a capture root",
                root.tag_name
            )));
        }

        let root_rect = root.rect().unwrap_or_else(|e| {
            log::debug!("Root rect unavailable, using defaults: {}", e);
            BoundingBox::new(0.0, 0.0, 0.0, 0.0)
        });
        let origin = (root_rect.x, root_rect.y);

        let mut records = vec![self.root_record(root, &root_rect)];
        self.walk(root, origin, true, &mut records);

        log::info!(
            "Extracted {} layers from <{}>",
            records.len(),
            root.tag_name
        );
        Ok(records)
    }

    fn root_record(&self, root: &ElementNode, rect: &BoundingBox) -> LayerRecord {
        let width = if rect.width > 0.0 { rect.width } else { self.options.default_width };
        let height = if rect.height > 0.0 { rect.height } else { self.options.default_height };

        let background = root
            .style
            .as_ref()
            .map(|s| s.background_color.as_str())
            .filter(|bg| !is_transparent(Some(bg)))
            .unwrap_or(&self.options.default_background);

        LayerRecord::frame(width, height)
            .with_name(self.options.root_name.clone())
            .with_fill(background)
            .sanitized()
    }

    fn walk(&self, node: &ElementNode, origin: (f64, f64), is_root: bool, out: &mut Vec<LayerRecord>) {
        if node.is_non_visual() {
            return;
        }

        match self.visit(node, origin, is_root) {
            Ok(Visit::Hidden) => return,
            Ok(Visit::Layers(layers)) => out.extend(layers),
            Err(e) => log::debug!("Skipping record for {}: {}", node.label(), e),
        }

        for child in &node.children {
            self.walk(child, origin, false, out);
        }
    }

    fn visit(&self, node: &ElementNode, origin: (f64, f64), is_root: bool) -> Result<Visit> {
        let style = node.computed_style()?;
        if !style.is_rendered() {
            return Ok(Visit::Hidden);
        }

        let rect = node.rect()?.relative_to(origin.0, origin.1);
        if !rect.is_visible() {
            return Ok(Visit::Layers(Vec::new()));
        }

        let mut layers = Vec::new();

        if let Some(text) = node.direct_text() {
            layers.push(self.text_record(text, style, &rect));
        }

        if !is_root && has_box_paint(style) {
            layers.push(self.box_record(LayerKind::Rectangle, node, style, &rect));
        } else if is_root && style.border_width() > 0.0 {
            // Background already lives on the FRAME; keep only the border
            let mut border = self.box_record(LayerKind::Rectangle, node, style, &rect);
            border.fill = None;
            layers.push(border);
        }

        if node.is_image() {
            layers.push(self.box_record(LayerKind::Image, node, style, &rect));
        }

        Ok(Visit::Layers(layers.into_iter().map(LayerRecord::sanitized).collect()))
    }

    fn text_record(&self, text: String, style: &ComputedStyle, rect: &BoundingBox) -> LayerRecord {
        let name: String = text.chars().take(self.options.max_name_len).collect();
        let mut record = LayerRecord::text(text, rect.x, rect.y, rect.width, rect.height).with_name(name);

        record.font_family = style.primary_font_family();
        record.font_weight = Some(style.font_weight());
        record.font_size = style.font_size();
        if !is_transparent(Some(&style.color)) {
            record.fill = Some(style.color.clone());
        }
        with_opacity(record, style)
    }

    fn box_record(
        &self,
        kind: LayerKind,
        node: &ElementNode,
        style: &ComputedStyle,
        rect: &BoundingBox,
    ) -> LayerRecord {
        let mut record = LayerRecord::new(kind).with_geometry(rect.x, rect.y, rect.width, rect.height);

        record.name = match kind {
            LayerKind::Image => node
                .get_attribute("alt")
                .map(|alt| alt.trim())
                .filter(|alt| !alt.is_empty())
                .map(|alt| alt.chars().take(self.options.max_name_len).collect())
                .unwrap_or_else(|| node.label()),
            _ => node.label(),
        };

        if !is_transparent(Some(&style.background_color)) {
            record.fill = Some(style.background_color.clone());
        } else if kind == LayerKind::Image {
            record.fill = Some(self.options.image_placeholder.clone());
        }

        let border = style.border_width();
        if border > 0.0 {
            record.stroke_width = Some(border);
            record.stroke_color = Some(style.border_color.clone());
        }

        let radius = style.corner_radius(rect);
        if radius > 0.0 {
            record.corner_radius = Some(radius);
        }

        with_opacity(record, style)
    }
}

fn has_box_paint(style: &ComputedStyle) -> bool {
    !is_transparent(Some(&style.background_color)) || style.border_width() > 0.0
}

fn with_opacity(mut record: LayerRecord, style: &ComputedStyle) -> LayerRecord {
    let opacity = style.opacity();
    if opacity < 1.0 {
        record.opacity = Some(opacity);
    }
    record
}

/// Extract with default options
pub fn extract(root: &ElementNode) -> Result<Vec<LayerRecord>> {
    Extractor::default().extract(root)
}

use crate::error::{ImportError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Kind tag of a layer record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LayerKind {
    Frame,
    Rectangle,
    Text,
    Image,
    /// Any tag this crate does not know; skipped on render
    #[serde(other)]
    Unknown,
}

impl LayerKind {
    /// Human label used when a record carries no name
    pub fn label(&self) -> &'static str {
        match self {
            LayerKind::Frame => "Frame",
            LayerKind::Rectangle => "Rectangle",
            LayerKind::Text => "Text",
            LayerKind::Image => "Image",
            LayerKind::Unknown => "Layer",
        }
    }
}

/// One flattened visual unit of a captured page.
///
/// Records carry absolute coordinates relative to the captured root and no
/// parent pointer; position in the sequence is their paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerRecord {
    pub kind: LayerKind,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_number")]
    pub x: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub y: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub width: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub height: f64,

    /// Background color, or text color for TEXT records
    #[serde(default, alias = "color", skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,

    /// Absent means fully opaque
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl LayerRecord {
    /// Create an empty record of the given kind at the origin
    pub fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            name: String::new(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            fill: None,
            text: None,
            font_family: None,
            font_weight: None,
            font_size: None,
            stroke_color: None,
            stroke_width: None,
            corner_radius: None,
            opacity: None,
        }
    }

    /// Root frame record
    pub fn frame(width: f64, height: f64) -> Self {
        Self::new(LayerKind::Frame).with_geometry(0.0, 0.0, width, height)
    }

    /// Rectangle record
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(LayerKind::Rectangle).with_geometry(x, y, width, height)
    }

    /// Image placeholder record
    pub fn image(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(LayerKind::Image).with_geometry(x, y, width, height)
    }

    /// Text record
    pub fn text(characters: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        let mut record = Self::new(LayerKind::Text).with_geometry(x, y, width, height);
        record.text = Some(characters.into());
        record
    }

    /// Builder method: set position and size
    pub fn with_geometry(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self
    }

    /// Builder method: set display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder method: set fill (or text color)
    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// Builder method: set typography hints
    pub fn with_font(mut self, family: impl Into<String>, weight: f64, size: f64) -> Self {
        self.font_family = Some(family.into());
        self.font_weight = Some(weight);
        self.font_size = Some(size);
        self
    }

    /// Builder method: set border
    pub fn with_stroke(mut self, color: impl Into<String>, width: f64) -> Self {
        self.stroke_color = Some(color.into());
        self.stroke_width = Some(width);
        self
    }

    /// Builder method: set corner radius
    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = Some(radius);
        self
    }

    /// Builder method: set opacity
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Name to show in the layer list, derived from kind and text when absent
    pub fn display_name(&self) -> String {
        if !self.name.trim().is_empty() {
            return self.name.clone();
        }
        match (&self.kind, &self.text) {
            (LayerKind::Text, Some(text)) if !text.trim().is_empty() => {
                text.trim().chars().take(40).collect()
            }
            (kind, _) => kind.label().to_string(),
        }
    }

    /// Requested font weight, 400 when missing or out of range
    pub fn weight(&self) -> u16 {
        match self.font_weight {
            Some(w) if w.is_finite() && (1.0..=1000.0).contains(&w) => w.round() as u16,
            _ => 400,
        }
    }

    /// Coerce every numeric field into a usable range.
    ///
    /// Non-finite geometry becomes 0 and negative sizes become 0; optional
    /// numbers that are non-finite or meaningless are dropped. Opacity is kept
    /// only below 1.
    pub fn sanitized(mut self) -> Self {
        self.x = finite_or_zero(self.x);
        self.y = finite_or_zero(self.y);
        self.width = finite_or_zero(self.width).max(0.0);
        self.height = finite_or_zero(self.height).max(0.0);

        self.font_weight = self.font_weight.filter(|w| w.is_finite() && *w > 0.0);
        self.font_size = self.font_size.filter(|s| s.is_finite() && *s > 0.0);
        self.stroke_width = self.stroke_width.filter(|w| w.is_finite() && *w > 0.0);
        self.corner_radius = self.corner_radius.filter(|r| r.is_finite() && *r > 0.0);
        self.opacity = self
            .opacity
            .filter(|o| o.is_finite() && *o < 1.0)
            .map(|o| o.max(0.0));
        self
    }
}

/// Geometry reads as 0 when it is `null` or not a number (`JSON.stringify(NaN)` gives `null`)
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    })
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Check the structural invariants of an extracted sequence: non-empty,
/// element 0 is a FRAME, every number finite.
pub fn validate_sequence(records: &[LayerRecord]) -> Result<()> {
    let root = records.first().ok_or(ImportError::EmptyInput)?;
    if root.kind != LayerKind::Frame {
        return Err(ImportError::InvalidInput(format!(
            "first layer must be a FRAME, found {:?}",
            root.kind
        )));
    }

    for (i, record) in records.iter().enumerate() {
        let optional = [
            record.font_weight,
            record.font_size,
            record.stroke_width,
            record.corner_radius,
            record.opacity,
        ];
        let all_finite = [record.x, record.y, record.width, record.height]
            .into_iter()
            .chain(optional.into_iter().flatten())
            .all(f64::is_finite);
        if !all_finite {
            return Err(ImportError::InvalidInput(format!(
                "layer {} ({}) has a non-finite number",
                i,
                record.display_name()
            )));
        }
    }

    Ok(())
}

use crate::dom::element::BoundingBox;
use serde::{Deserialize, Serialize};

/// Resolved (post-cascade) style values of an element, as the browser
/// reports them through `getComputedStyle`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComputedStyle {
    pub display: String,
    pub visibility: String,
    pub background_color: String,
    pub color: String,
    pub font_family: String,
    pub font_weight: String,
    pub font_size: String,
    pub border_width: String,
    pub border_color: String,
    pub border_radius: String,
    pub opacity: String,
}

impl ComputedStyle {
    /// Create an empty style (everything unset)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set a property by its CSS name.
    ///
    /// Unknown properties are ignored.
    pub fn with(mut self, property: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match property {
            "display" => self.display = value,
            "visibility" => self.visibility = value,
            "background-color" => self.background_color = value,
            "color" => self.color = value,
            "font-family" => self.font_family = value,
            "font-weight" => self.font_weight = value,
            "font-size" => self.font_size = value,
            "border-width" => self.border_width = value,
            "border-color" => self.border_color = value,
            "border-radius" => self.border_radius = value,
            "opacity" => self.opacity = value,
            _ => {}
        }
        self
    }

    /// False when the element is not painted at all (`display: none` or
    /// `visibility: hidden|collapse`)
    pub fn is_rendered(&self) -> bool {
        let display = self.display.trim();
        let visibility = self.visibility.trim();
        !display.eq_ignore_ascii_case("none")
            && !visibility.eq_ignore_ascii_case("hidden")
            && !visibility.eq_ignore_ascii_case("collapse")
    }

    /// First family of the font stack with quotes stripped
    pub fn primary_font_family(&self) -> Option<String> {
        self.font_family
            .split(',')
            .next()
            .map(|family| family.trim().trim_matches(|c: char| c == '"' || c == '\'').trim())
            .filter(|family| !family.is_empty())
            .map(str::to_string)
    }

    /// Numeric font weight, 400 when unparsable
    pub fn font_weight(&self) -> f64 {
        let raw = self.font_weight.trim();
        match raw.to_ascii_lowercase().as_str() {
            "bold" | "bolder" => 700.0,
            "lighter" => 300.0,
            _ => raw
                .parse::<f64>()
                .ok()
                .filter(|w| w.is_finite() && *w > 0.0)
                .unwrap_or(400.0),
        }
    }

    /// Font size in pixels
    pub fn font_size(&self) -> Option<f64> {
        parse_px(&self.font_size).filter(|size| *size > 0.0)
    }

    /// Border width in pixels, 0 when absent
    pub fn border_width(&self) -> f64 {
        parse_px(&self.border_width).unwrap_or(0.0).max(0.0)
    }

    /// Corner radius in pixels; percentages resolve against the shorter side
    pub fn corner_radius(&self, rect: &BoundingBox) -> f64 {
        let first = self.border_radius.split_whitespace().next().unwrap_or("");
        let radius = match first.strip_suffix('%') {
            Some(pct) => pct
                .parse::<f64>()
                .map(|p| p / 100.0 * rect.width.min(rect.height))
                .unwrap_or(0.0),
            None => parse_px(first).unwrap_or(0.0),
        };
        if radius.is_finite() { radius.max(0.0) } else { 0.0 }
    }

    /// Element opacity, 1 when unset or unparsable
    pub fn opacity(&self) -> f64 {
        self.opacity
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|o| o.is_finite())
            .map(|o| o.clamp(0.0, 1.0))
            .unwrap_or(1.0)
    }
}

/// Parse a CSS length in pixels (`"16px"`, `"16"`, `"1.5px"`)
pub fn parse_px(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let number = raw.strip_suffix("px").unwrap_or(raw).trim();
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

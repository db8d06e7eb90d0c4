//! Color string parsing shared by the extractor and the renderer.
//!
//! Computed styles report colors as `rgb()`/`rgba()` strings, layer payloads
//! written by hand tend to use hex or a few names. Everything resolves to an
//! [`Rgb`] with channels in `[0, 1]`, or to `None` meaning "no fill".
//! Alpha is never folded into the color; opacity travels as its own field.

use serde::{Deserialize, Serialize};

/// Normalized color with each channel in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };

    /// Create a color from unit channels, clamping each into `[0, 1]`
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: unit(r),
            g: unit(g),
            b: unit(b),
        }
    }

    /// Create a color from 8-bit channels
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: f64::from(r) / 255.0,
            g: f64::from(g) / 255.0,
            b: f64::from(b) / 255.0,
        }
    }

    /// Format as a lowercase `#rrggbb` string
    pub fn to_hex(&self) -> String {
        let channel = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

fn unit(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

/// Named colors understood without a CSS engine
const NAMED_COLORS: [(&str, (u8, u8, u8)); 7] = [
    ("white", (255, 255, 255)),
    ("black", (0, 0, 0)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("blue", (0, 0, 255)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
];

/// Parse a color string into a normalized [`Rgb`].
///
/// Accepts `&str` or `Option<&str>`. Returns `None` for absent, empty,
/// `transparent`, zero-alpha and unrecognized input; an unparseable color is
/// never an error.
pub fn parse_color<'a>(input: impl Into<Option<&'a str>>) -> Option<Rgb> {
    let raw = input.into()?.trim();
    if raw.is_empty() {
        return None;
    }
    let lower = raw.to_ascii_lowercase();

    if lower == "transparent" {
        return None;
    }

    if let Some(args) = functional_args(&lower) {
        return parse_rgb_function(&args);
    }

    if let Some(hex) = lower.strip_prefix('#') {
        return parse_hex(hex);
    }

    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, (r, g, b))| Rgb::from_u8(*r, *g, *b))
}

/// Whether a color string paints nothing at all.
///
/// Only absence, `transparent` and an explicit zero alpha count; strings that
/// are merely unrecognized are left for the renderer to decide.
pub fn is_transparent(input: Option<&str>) -> bool {
    let Some(raw) = input.map(str::trim) else {
        return true;
    };
    if raw.is_empty() {
        return true;
    }
    let lower = raw.to_ascii_lowercase();
    if lower == "transparent" {
        return true;
    }
    functional_args(&lower)
        .and_then(|args| args.get(3).map(|alpha| parse_alpha(alpha) == Some(0.0)))
        .unwrap_or(false)
}

/// Split the arguments of `rgb(...)`/`rgba(...)`, accepting both the comma
/// and the space/slash syntaxes
fn functional_args(lower: &str) -> Option<Vec<String>> {
    let body = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))?
        .strip_suffix(')')?;

    Some(
        body.split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

fn parse_rgb_function(args: &[String]) -> Option<Rgb> {
    if args.len() < 3 {
        return None;
    }
    if let Some(alpha) = args.get(3) {
        if parse_alpha(alpha) == Some(0.0) {
            return None;
        }
    }

    let r = parse_channel(&args[0])?;
    let g = parse_channel(&args[1])?;
    let b = parse_channel(&args[2])?;
    Some(Rgb::new(r / 255.0, g / 255.0, b / 255.0))
}

/// Channel value on the 0-255 scale; percentages are scaled
fn parse_channel(raw: &str) -> Option<f64> {
    let value = match raw.strip_suffix('%') {
        Some(pct) => pct.parse::<f64>().ok()? * 255.0 / 100.0,
        None => raw.parse::<f64>().ok()?,
    };
    value.is_finite().then(|| value.clamp(0.0, 255.0))
}

fn parse_alpha(raw: &str) -> Option<f64> {
    let value = match raw.strip_suffix('%') {
        Some(pct) => pct.parse::<f64>().ok()? / 100.0,
        None => raw.parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        n if n >= 6 => hex[..6].to_string(),
        _ => return None,
    };

    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some(Rgb::from_u8(channel(0)?, channel(2)?, channel(4)?))
}

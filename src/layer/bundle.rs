use crate::error::{ImportError, Result};
use crate::layer::record::LayerRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Length of transfer identifiers handed out by the upload store (lowercase hex)
pub const TRANSFER_ID_LEN: usize = 6;

/// Upload envelope carrying a layer sequence between capture and import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerBundle {
    pub layers: Vec<LayerRecord>,

    #[serde(
        default,
        rename = "transferId",
        skip_serializing_if = "Option::is_none"
    )]
    pub transfer_id: Option<String>,
}

impl LayerBundle {
    /// Create a bundle without a transfer identifier
    pub fn new(layers: Vec<LayerRecord>) -> Self {
        Self {
            layers,
            transfer_id: None,
        }
    }

    /// Builder method: set transfer identifier
    pub fn with_transfer_id(mut self, id: impl Into<String>) -> Self {
        self.transfer_id = Some(id.into());
        self
    }

    /// Parse either an envelope object or a bare array of records.
    ///
    /// Entries that do not decode as records are dropped and logged so one
    /// damaged entry does not void the whole payload.
    pub fn parse(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Same as [`LayerBundle::parse`] for an already decoded JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        let (entries, transfer_id) = match value {
            Value::Array(entries) => (entries, None),
            Value::Null => (Vec::new(), None),
            Value::Object(mut map) => {
                let transfer_id = map
                    .remove("transferId")
                    .and_then(|v| v.as_str().map(str::to_string));
                match map.remove("layers") {
                    Some(Value::Array(entries)) => (entries, transfer_id),
                    Some(Value::Null) | None => (Vec::new(), transfer_id),
                    Some(other) => {
                        return Err(ImportError::InvalidInput(format!(
                            "'layers' must be an array, got {}",
                            json_type(&other)
                        )));
                    }
                }
            }
            other => {
                return Err(ImportError::InvalidInput(format!(
                    "expected a layer array or bundle object, got {}",
                    json_type(&other)
                )));
            }
        };

        let layers = decode_records(entries);
        Ok(Self {
            layers,
            transfer_id,
        })
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Whether a string looks like a transfer identifier
    pub fn is_valid_transfer_id(id: &str) -> bool {
        id.len() == TRANSFER_ID_LEN
            && id
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    }
}

/// Decode each entry independently, keeping the order of the ones that succeed
pub fn decode_records(entries: Vec<Value>) -> Vec<LayerRecord> {
    let total = entries.len();
    let records: Vec<LayerRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value::<LayerRecord>(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Dropping undecodable layer {}: {}", i, e);
                None
            }
        })
        .collect();

    if records.len() < total {
        log::info!("Decoded {} of {} layers", records.len(), total);
    }
    records
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerKind;

    #[test]
    fn test_parse_bare_array() {
        let bundle = LayerBundle::parse(
            r##"[{"kind":"FRAME","width":800,"height":600,"fill":"#ffffff"},
                 {"kind":"RECTANGLE","x":10,"y":10,"width":100,"height":50}]"##,
        )
        .unwrap();

        assert_eq!(bundle.layers.len(), 2);
        assert_eq!(bundle.layers[0].kind, LayerKind::Frame);
        assert!(bundle.transfer_id.is_none());
    }

    #[test]
    fn test_parse_envelope() {
        let bundle = LayerBundle::parse(
            r#"{"transferId":"a1b2c3","layers":[{"kind":"FRAME","width":10,"height":10}]}"#,
        )
        .unwrap();

        assert_eq!(bundle.transfer_id.as_deref(), Some("a1b2c3"));
        assert_eq!(bundle.layers.len(), 1);
    }

    #[test]
    fn test_damaged_entries_are_dropped_in_order() {
        let bundle = LayerBundle::parse(
            r#"[{"kind":"FRAME"},
                {"kind":"TEXT","fontSize":"oops"},
                {"kind":"RECTANGLE","name":"second"},
                42]"#,
        )
        .unwrap();

        assert_eq!(bundle.layers.len(), 2);
        assert_eq!(bundle.layers[1].name, "second");
    }

    #[test]
    fn test_null_coordinates_keep_the_layer() {
        let bundle = LayerBundle::parse(
            r#"[{"kind":"FRAME","width":800,"height":600},
                {"kind":"RECTANGLE","x":null,"y":10,"width":100,"height":50}]"#,
        )
        .unwrap();

        assert_eq!(bundle.layers.len(), 2);
        assert_eq!(bundle.layers[1].kind, LayerKind::Rectangle);
        assert_eq!((bundle.layers[1].x, bundle.layers[1].y), (0.0, 10.0));
    }

    #[test]
    fn test_rejects_non_layer_payloads() {
        assert!(matches!(
            LayerBundle::parse(r#""hello""#),
            Err(ImportError::InvalidInput(_))
        ));
        assert!(matches!(
            LayerBundle::parse(r#"{"layers": 3}"#),
            Err(ImportError::InvalidInput(_))
        ));
        assert!(matches!(
            LayerBundle::parse("{not json"),
            Err(ImportError::Serialization(_))
        ));
    }

    #[test]
    fn test_missing_layers_is_empty() {
        let bundle = LayerBundle::parse(r#"{"error": "Design not found or expired"}"#).unwrap();
        assert!(bundle.layers.is_empty());
    }

    #[test]
    fn test_to_json_envelope() {
        let bundle = LayerBundle::new(vec![LayerRecord::frame(10.0, 20.0)]).with_transfer_id("zz9x1q");
        let json = bundle.to_json().unwrap();
        assert!(json.contains("\"transferId\": \"zz9x1q\""));
        assert!(json.contains("\"FRAME\""));
    }

    #[test]
    fn test_transfer_id_shape() {
        assert!(LayerBundle::is_valid_transfer_id("3f9a0c"));
        assert!(!LayerBundle::is_valid_transfer_id("3F9A0C"));
        assert!(!LayerBundle::is_valid_transfer_id("3f9a0"));
        assert!(!LayerBundle::is_valid_transfer_id("3f9a0c1"));
        assert!(!LayerBundle::is_valid_transfer_id("zz9x1q"));
    }
}

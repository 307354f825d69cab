//! JSON payload codec for stored records.
//!
//! # Responsibility
//! - Render records as JSON documents and bind them back to typed values.
//! - Reproduce the store's serializer options independently of how a
//!   record type annotates its fields.
//!
//! # Invariants
//! - Object fields holding `null` are omitted from encoded payloads.
//! - Field name matching on decode is ASCII-case-insensitive for record
//!   types whose serde field names are lowercase (the Rust default).
//! - Fieldless enum variants round-trip as their textual name, never a
//!   numeric code.
//! - Unknown payload fields are ignored; record types must not opt into
//!   `deny_unknown_fields`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CodecResult<T> = Result<T, CodecError>;

/// Errors from record payload encoding and decoding.
#[derive(Debug)]
pub enum CodecError {
    Serialize(serde_json::Error),
    Deserialize(serde_json::Error),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize(err) => write!(f, "failed to encode record: {err}"),
            Self::Deserialize(err) => write!(f, "failed to decode record: {err}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialize(err) => Some(err),
            Self::Deserialize(err) => Some(err),
        }
    }
}

/// Encodes one record as a JSON document.
///
/// Fields serialized as `null` are dropped from objects at every nesting
/// level, so optional fields absent from a record never appear in the file.
pub fn encode<T: Serialize>(record: &T) -> CodecResult<String> {
    let value = serde_json::to_value(record).map_err(CodecError::Serialize)?;
    serde_json::to_string(&drop_null_fields(value)).map_err(CodecError::Serialize)
}

/// Decodes one record from a JSON document.
///
/// Object keys are folded to ASCII lowercase before binding, which gives
/// case-insensitive field matching against lowercase serde field names.
pub fn decode<T: DeserializeOwned>(payload: &str) -> CodecResult<T> {
    let value: Value = serde_json::from_str(payload).map_err(CodecError::Deserialize)?;
    serde_json::from_value(fold_keys_lowercase(value)).map_err(CodecError::Deserialize)
}

fn drop_null_fields(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut cleaned = Map::with_capacity(map.len());
            for (key, entry) in map {
                if entry.is_null() {
                    continue;
                }
                cleaned.insert(key, drop_null_fields(entry));
            }
            Value::Object(cleaned)
        }
        // Null array elements are positional data, only object fields are dropped.
        Value::Array(items) => Value::Array(items.into_iter().map(drop_null_fields).collect()),
        other => other,
    }
}

fn fold_keys_lowercase(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut folded = Map::with_capacity(map.len());
            for (key, entry) in map {
                folded.insert(key.to_ascii_lowercase(), fold_keys_lowercase(entry));
            }
            Value::Object(folded)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(fold_keys_lowercase).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, encode, CodecError};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    enum Severity {
        #[default]
        Low,
        High,
    }

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Alert {
        message: String,
        severity: Severity,
        acknowledged_by: Option<String>,
    }

    #[test]
    fn encode_omits_null_fields() {
        let alert = Alert {
            message: "disk almost full".to_string(),
            severity: Severity::High,
            acknowledged_by: None,
        };

        let payload = encode(&alert).expect("encode should succeed");
        assert!(!payload.contains("acknowledged_by"));
        assert!(!payload.contains("null"));
    }

    #[test]
    fn encode_renders_enum_variants_as_text() {
        let alert = Alert {
            message: "probe".to_string(),
            severity: Severity::High,
            acknowledged_by: Some("ops".to_string()),
        };

        let payload = encode(&alert).expect("encode should succeed");
        assert!(payload.contains("\"high\""));
    }

    #[test]
    fn decode_matches_field_names_case_insensitively() {
        let payload = r#"{"Message":"late heartbeat","SEVERITY":"high"}"#;

        let alert: Alert = decode(payload).expect("decode should succeed");
        assert_eq!(alert.message, "late heartbeat");
        assert_eq!(alert.severity, Severity::High);
        assert_eq!(alert.acknowledged_by, None);
    }

    #[test]
    fn decode_ignores_unknown_fields() {
        let payload = r#"{"message":"ok","severity":"low","added_in_v2":true}"#;

        let alert: Alert = decode(payload).expect("decode should succeed");
        assert_eq!(alert.message, "ok");
    }

    #[test]
    fn decode_failure_reports_deserialize_error() {
        let err = decode::<Alert>("{ this is not json").expect_err("decode must fail");
        assert!(matches!(err, CodecError::Deserialize(_)));
    }
}

//! Decoder implementations

use super::types::RecordDecoder;
use crate::error::{Error, Result};
use serde_json::Value;

/// Record path meaning "every element of the root array"
pub const ROOT_RECORDS_PATH: &str = "$[*]";

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder with optional record path extraction
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    /// JSONPath to extract records
    record_path: Option<String>,
}

impl JsonDecoder {
    /// Create a decoder that reads records from the root array
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let record_path = match path.trim() {
            "" | "$" | ROOT_RECORDS_PATH => None,
            _ => Some(path),
        };
        Self { record_path }
    }

    /// The configured record path, if any
    pub fn record_path(&self) -> Option<&str> {
        self.record_path.as_deref()
    }

    /// Extract records from a JSON value using a path
    fn extract_records(&self, value: Value) -> Result<Vec<Value>> {
        match &self.record_path {
            Some(path) => {
                // jsonpath-rust only for wildcard patterns; simple paths are walked directly
                if path.contains('*') && !path.contains("[-") {
                    extract_with_jsonpath(&value, path)
                } else {
                    match extract_simple_path(&value, path) {
                        Some(Value::Array(arr)) => Ok(arr),
                        Some(Value::Null) | None => Ok(vec![]),
                        Some(v) => Ok(vec![v]),
                    }
                }
            }
            None => match value {
                Value::Array(arr) => Ok(arr),
                Value::Null => Ok(vec![]),
                other => Ok(vec![other]),
            },
        }
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        if body.trim().is_empty() {
            return Ok(vec![]);
        }
        let value = self.decode_raw(body)?;
        self.extract_records(value)
    }

    fn decode_raw(&self, body: &str) -> Result<Value> {
        serde_json::from_str(body).map_err(|e| Error::Decode {
            message: format!("Failed to parse JSON: {e}"),
        })
    }
}

// ============================================================================
// Path helpers
// ============================================================================

/// Extract a value using simple dot-notation path
fn extract_simple_path(value: &Value, path: &str) -> Option<Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    let mut current = value;

    for part in path.split('.') {
        // Handle array indexing like "data[0]" or "items[-1]"
        if let Some(bracket_pos) = part.find('[') {
            let name = &part[..bracket_pos];
            let index_str = part[bracket_pos + 1..].trim_end_matches(']');

            if !name.is_empty() {
                current = current.get(name)?;
            }

            let index = index_str.parse::<i64>().ok()?;
            let Value::Array(arr) = current else {
                return None;
            };
            #[allow(clippy::cast_possible_wrap)]
            let idx = if index < 0 {
                arr.len() as i64 + index
            } else {
                index
            };
            current = arr.get(usize::try_from(idx).ok()?)?;
        } else {
            current = current.get(part)?;
        }
    }

    Some(current.clone())
}

/// Extract records using jsonpath-rust
fn extract_with_jsonpath(value: &Value, path: &str) -> Result<Vec<Value>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path)
        .map_err(|e| Error::json_path(format!("Invalid JSONPath: {e}")))?;

    match jp.find(value) {
        Value::Array(arr) => Ok(arr),
        Value::Null => Ok(vec![]),
        other => Ok(vec![other]),
    }
}

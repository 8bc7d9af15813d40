//! JSON decoder and path helpers

use crate::error::{Error, Result};
use crate::types::scalar_to_string;
use serde_json::Value;

/// JSON decoder with optional record path extraction
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    /// JSONPath to extract records
    record_path: Option<String>,
}

impl JsonDecoder {
    /// Create a decoder that treats the whole body as the record set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: Some(path.into()),
        }
    }

    /// Parse a raw body into a JSON document
    pub fn decode_raw(&self, body: &str) -> Result<Value> {
        serde_json::from_str(body).map_err(|e| Error::Decode {
            message: format!("Failed to parse JSON: {e}"),
        })
    }

    /// Extract the records from an already parsed document
    ///
    /// A missing record container yields an empty page, not an error.
    pub fn records(&self, value: &Value) -> Result<Vec<Value>> {
        match &self.record_path {
            Some(path) => {
                // Only wildcard paths need the full JSONPath engine
                if path.contains('*') && !path.contains("[-") {
                    extract_with_jsonpath(value, path)
                } else {
                    match extract_path(value, path) {
                        Some(Value::Array(arr)) => Ok(arr),
                        Some(Value::Null) | None => Ok(vec![]),
                        Some(v) => Ok(vec![v]),
                    }
                }
            }
            None => match value {
                Value::Array(arr) => Ok(arr.clone()),
                _ => Ok(vec![value.clone()]),
            },
        }
    }

    /// Parse a raw body and extract its records
    pub fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let value = self.decode_raw(body)?;
        self.records(&value)
    }
}

/// Extract a value at a dotted path, with `[n]` / `[-n]` indexing
///
/// A trailing `[*]` returns the array itself.
pub fn extract_path(value: &Value, path: &str) -> Option<Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value.clone());
    }

    let mut current = value;
    for part in path.split('.') {
        if let Some(bracket_pos) = part.find('[') {
            let name = &part[..bracket_pos];
            let index_str = part[bracket_pos + 1..].strip_suffix(']')?;

            if !name.is_empty() {
                current = current.get(name)?;
            }

            if index_str == "*" {
                return Some(current.clone());
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

/// Extract a scalar at a dotted path as a string
///
/// Objects, arrays and null yield `None`.
pub fn extract_string(value: &Value, path: &str) -> Option<String> {
    extract_path(value, path).as_ref().and_then(scalar_to_string)
}

/// Extract using the JSONPath engine (for wildcard patterns)
fn extract_with_jsonpath(value: &Value, path: &str) -> Result<Vec<Value>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path).map_err(|e| Error::JsonPath {
        message: format!("Invalid JSONPath: {e}"),
    })?;

    match jp.find(value) {
        Value::Array(arr) => Ok(arr),
        Value::Null => Ok(vec![]),
        other => Ok(vec![other]),
    }
}

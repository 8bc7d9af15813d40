//! State types for tracking replication progress
//!
//! These types are serialized to JSON and persisted between runs. The layout
//! is `{"bookmarks": {"<stream>": {"replication_key": ..., "replication_key_value": ...}}}`;
//! older state files keep a single `replication_key_value` at the top level.

use crate::error::{Error, Result};
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Complete replication state for a tap run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplicationState {
    /// Per-stream bookmarks
    #[serde(default)]
    pub bookmarks: BTreeMap<String, Bookmark>,

    /// Legacy flat bookmark, consulted when a stream has no nested entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key_value: Option<Value>,

    /// Keys written by other tools, preserved untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReplicationState {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored bookmark for a stream
    ///
    /// The nested `bookmarks.<stream>.replication_key_value` wins over the
    /// flat top-level value when both are present.
    pub fn replication_value(&self, stream: &str) -> Option<&Value> {
        self.bookmarks
            .get(stream)
            .and_then(|b| b.replication_key_value.as_ref())
            .or(self.replication_key_value.as_ref())
            .filter(|v| !v.is_null())
    }

    /// Overwrite the nested bookmark for a stream (no ordering checks)
    pub fn set_replication_value(
        &mut self,
        stream: &str,
        replication_key: Option<&str>,
        value: Value,
    ) {
        let bookmark = self.bookmarks.entry(stream.to_string()).or_default();
        if let Some(key) = replication_key {
            bookmark.replication_key = Some(key.to_string());
        }
        bookmark.replication_key_value = Some(value);
    }
}

/// Bookmark for a single stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Field the bookmark was taken from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,

    /// Last replication key value emitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key_value: Option<Value>,

    /// Keys written by other tools, preserved untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Order two replication key values
///
/// RFC 3339 timestamps compare as instants, so differing offsets or precision
/// still order correctly. Other strings compare lexicographically and numbers
/// numerically. Any other pairing, including a timestamp against a plain
/// string, cannot be ordered.
pub fn compare_replication_values(left: &Value, right: &Value) -> Result<Ordering> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => {
            match (DateTime::parse_from_rfc3339(a), DateTime::parse_from_rfc3339(b)) {
                (Ok(a), Ok(b)) => Ok(a.cmp(&b)),
                (Err(_), Err(_)) => Ok(a.cmp(b)),
                _ => Err(Error::state_comparison(left, right)),
            }
        }
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => Ok(a.cmp(&b)),
            _ => a
                .as_f64()
                .zip(b.as_f64())
                .and_then(|(a, b)| a.partial_cmp(&b))
                .ok_or_else(|| Error::state_comparison(left, right)),
        },
        _ => Err(Error::state_comparison(left, right)),
    }
}

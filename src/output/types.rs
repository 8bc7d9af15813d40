//! Output message types

use crate::streams::StreamDefinition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message emitted during a sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Stream schema, emitted before the stream's first record
    Schema {
        /// Stream name
        stream: String,
        /// JSON schema of the records
        schema: Value,
        /// Primary key fields
        key_properties: Vec<String>,
        /// Replication key fields
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        bookmark_properties: Vec<String>,
    },
    /// One extracted record
    Record {
        /// Stream name
        stream: String,
        /// The record as returned by the API
        record: Value,
        /// Primary key fields
        key_properties: Vec<String>,
        /// Replication key field
        #[serde(default, skip_serializing_if = "Option::is_none")]
        replication_key: Option<String>,
        /// When the record was extracted
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time_extracted: Option<DateTime<Utc>>,
    },
    /// Checkpoint of the replication state
    State {
        /// Full bookmark document
        value: Value,
    },
}

impl Message {
    /// Create a schema message for a stream
    pub fn schema(def: &StreamDefinition) -> Self {
        Self::Schema {
            stream: def.name.clone(),
            schema: def.schema.clone(),
            key_properties: def.primary_keys.clone(),
            bookmark_properties: def.replication_key.iter().cloned().collect(),
        }
    }

    /// Create a record message for a stream
    pub fn record(def: &StreamDefinition, record: Value) -> Self {
        Self::Record {
            stream: def.name.clone(),
            record,
            key_properties: def.primary_keys.clone(),
            replication_key: def.replication_key.clone(),
            time_extracted: Some(Utc::now()),
        }
    }

    /// Create a state message
    pub fn state(value: Value) -> Self {
        Self::State { value }
    }

    /// Stream this message belongs to (`None` for state)
    pub fn stream(&self) -> Option<&str> {
        match self {
            Self::Schema { stream, .. } | Self::Record { stream, .. } => Some(stream),
            Self::State { .. } => None,
        }
    }

    /// Check if this is a schema message
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }

    /// Check if this is a record message
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// Check if this is a state message
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State { .. })
    }
}

//! Stream definition and catalog types

use crate::partition::ParentRouter;
use crate::types::ReplicationMethod;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Stream Definition
// ============================================================================

/// Link from a child stream to the parent stream that drives it
#[derive(Debug, Clone)]
pub struct ParentLink {
    /// Name of the parent stream
    pub stream: String,
    /// Derives the child context from each parent record
    pub router: ParentRouter,
}

/// Immutable stream descriptor, built once at startup
#[derive(Debug, Clone)]
pub struct StreamDefinition {
    /// Stream name
    pub name: String,
    /// Request path, may contain `{name}` placeholders
    pub path: String,
    /// Primary key fields
    pub primary_keys: Vec<String>,
    /// Replication key field, if the stream is incremental
    pub replication_key: Option<String>,
    /// Path to the records in a response body
    pub records_path: String,
    /// Path to the next page token, if the stream paginates
    pub next_page_path: Option<String>,
    /// Parent stream reference
    pub parent: Option<ParentLink>,
    /// Skip stored bookmarks and re-derive completeness from the parent
    pub ignore_parent_replication_key: bool,
    /// Whether the stream runs when no explicit selection is given
    pub selected_by_default: bool,
    /// JSON schema of the records
    pub schema: Value,
}

impl StreamDefinition {
    /// Create a root stream definition
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        records_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            primary_keys: Vec::new(),
            replication_key: None,
            records_path: records_path.into(),
            next_page_path: None,
            parent: None,
            ignore_parent_replication_key: false,
            selected_by_default: true,
            schema: serde_json::json!({"type": "object", "properties": {}}),
        }
    }

    /// Set the primary key fields
    #[must_use]
    pub fn with_primary_keys(mut self, keys: &[&str]) -> Self {
        self.primary_keys = keys.iter().map(ToString::to_string).collect();
        self
    }

    /// Set the replication key field
    #[must_use]
    pub fn with_replication_key(mut self, key: impl Into<String>) -> Self {
        self.replication_key = Some(key.into());
        self
    }

    /// Set the next page token path
    #[must_use]
    pub fn with_next_page_path(mut self, path: impl Into<String>) -> Self {
        self.next_page_path = Some(path.into());
        self
    }

    /// Make this a child of `parent`, deriving `context_key` from `parent_key`
    #[must_use]
    pub fn with_parent(
        mut self,
        parent: impl Into<String>,
        parent_key: impl Into<String>,
        context_key: impl Into<String>,
    ) -> Self {
        let router = ParentRouter::new(self.name.clone(), parent_key, context_key);
        self.parent = Some(ParentLink {
            stream: parent.into(),
            router,
        });
        self
    }

    /// Ignore stored bookmarks for this stream
    #[must_use]
    pub fn ignoring_parent_replication_key(mut self) -> Self {
        self.ignore_parent_replication_key = true;
        self
    }

    /// Set whether the stream is selected by default
    #[must_use]
    pub fn with_selected_by_default(mut self, selected: bool) -> Self {
        self.selected_by_default = selected;
        self
    }

    /// Set the record schema
    #[must_use]
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = schema;
        self
    }

    /// Name of the parent stream, if any
    pub fn parent_stream(&self) -> Option<&str> {
        self.parent.as_ref().map(|p| p.stream.as_str())
    }

    /// Whether stored bookmarks are consulted and advanced for this stream
    pub fn tracks_bookmark(&self) -> bool {
        self.replication_key.is_some() && !self.ignore_parent_replication_key
    }

    /// Replication method reported in the catalog
    pub fn replication_method(&self) -> ReplicationMethod {
        if self.tracks_bookmark() {
            ReplicationMethod::Incremental
        } else {
            ReplicationMethod::FullTable
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// One stream as reported by discovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stream identifier
    pub tap_stream_id: String,
    /// Stream name
    pub stream: String,
    /// JSON schema of the records
    pub schema: Value,
    /// Primary key fields
    pub key_properties: Vec<String>,
    /// Replication key field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,
    /// Replication method
    pub replication_method: ReplicationMethod,
    /// Selected when no explicit selection is given
    pub selected: bool,
    /// Parent stream name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_stream: Option<String>,
}

impl From<&StreamDefinition> for CatalogEntry {
    fn from(def: &StreamDefinition) -> Self {
        Self {
            tap_stream_id: def.name.clone(),
            stream: def.name.clone(),
            schema: def.schema.clone(),
            key_properties: def.primary_keys.clone(),
            replication_key: def.replication_key.clone(),
            replication_method: def.replication_method(),
            selected: def.selected_by_default,
            parent_stream: def.parent_stream().map(String::from),
        }
    }
}

/// Discovery output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Known streams
    pub streams: Vec<CatalogEntry>,
}

impl Catalog {
    /// Find a stream entry by name
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.streams.iter().find(|s| s.stream == name)
    }
}

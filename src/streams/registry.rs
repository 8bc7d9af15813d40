//! Known streams and their composition

use super::types::{Catalog, CatalogEntry, StreamDefinition};
use crate::decode::JsonDecoder;
use crate::error::{Error, Result};
use crate::pagination::{CursorPaginator, NoPaginator, PaginationStrategy};
use crate::params::{ContextParams, ParameterBuilder, SurveyResponseParams};
use crate::template::placeholders;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::fmt;

// ============================================================================
// Stream Kinds
// ============================================================================

/// Streams this tap knows how to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// Micro-survey responses, incremental on `created_at`
    SurveyResponses,
    /// Profile of the respondent behind each survey response
    SurveyResponseProfiles,
}

impl StreamKind {
    /// All kinds in registration order (parents before children)
    pub const ALL: [StreamKind; 2] = [
        StreamKind::SurveyResponses,
        StreamKind::SurveyResponseProfiles,
    ];

    /// Stream name
    pub fn name(self) -> &'static str {
        match self {
            StreamKind::SurveyResponses => "survey_responses",
            StreamKind::SurveyResponseProfiles => "survey_response_profiles",
        }
    }

    /// Look up a kind by stream name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Static definition of the stream
    pub fn definition(self) -> StreamDefinition {
        match self {
            StreamKind::SurveyResponses => {
                StreamDefinition::new(self.name(), "/v3/analyze/responses", "$.responses[*]")
                    .with_primary_keys(&["id"])
                    .with_replication_key("created_at")
                    .with_next_page_path("$.cursor.before")
                    .with_schema(survey_response_schema())
            }
            StreamKind::SurveyResponseProfiles => StreamDefinition::new(
                self.name(),
                "/v3/analyze/profiles/{profile_id}",
                "$.profile",
            )
            .with_primary_keys(&["id"])
            .with_parent(
                StreamKind::SurveyResponses.name(),
                "profile.id",
                "profile_id",
            )
            .ignoring_parent_replication_key()
            .with_selected_by_default(false)
            .with_schema(profile_schema()),
        }
    }

    /// Build the stream with its strategies
    pub fn build(self) -> Stream {
        let definition = self.definition();
        let path_keys = placeholders(&definition.path);

        let paginator: Box<dyn PaginationStrategy> = match &definition.next_page_path {
            Some(path) => Box::new(CursorPaginator::new(path.clone())),
            None => Box::new(NoPaginator),
        };
        let params: Box<dyn ParameterBuilder> = match self {
            StreamKind::SurveyResponses => Box::new(SurveyResponseParams::new(path_keys)),
            StreamKind::SurveyResponseProfiles => Box::new(ContextParams::new(path_keys)),
        };
        let decoder = JsonDecoder::with_path(definition.records_path.clone());

        Stream {
            kind: self,
            definition,
            paginator,
            params,
            decoder,
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Schemas
// ============================================================================

fn string() -> Value {
    json!({"type": ["string", "null"]})
}

fn date_time() -> Value {
    json!({"type": ["string", "null"], "format": "date-time"})
}

fn profile_properties() -> Value {
    json!({
        "id": string(),
        "browser_l": string(),
        "created_at": string(),
        "updated_at": string(),
        "company": {
            "type": ["object", "null"],
            "properties": {"uid": string()}
        }
    })
}

fn survey_response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": string(),
            "created_at": date_time(),
            "updated_at": date_time(),
            "finished_at": date_time(),
            "survey_id": string(),
            "profile_id": string(),
            "button_text": string(),
            "input_text": string(),
            "profile": {
                "type": ["object", "null"],
                "properties": profile_properties()
            }
        }
    })
}

fn profile_schema() -> Value {
    json!({
        "type": "object",
        "properties": profile_properties()
    })
}

// ============================================================================
// Stream
// ============================================================================

/// A stream definition composed with its strategies
pub struct Stream {
    /// Which stream this is
    pub kind: StreamKind,
    /// Immutable descriptor
    pub definition: StreamDefinition,
    /// Finds the next page token
    pub paginator: Box<dyn PaginationStrategy>,
    /// Builds request parameters
    pub params: Box<dyn ParameterBuilder>,
    /// Extracts records from response bodies
    pub decoder: JsonDecoder,
}

impl Stream {
    /// Stream name
    pub fn name(&self) -> &str {
        &self.definition.name
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("kind", &self.kind)
            .field("paginator", &self.paginator)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// All streams available to a run
#[derive(Debug)]
pub struct StreamRegistry {
    streams: Vec<Stream>,
}

impl Default for StreamRegistry {
    fn default() -> Self {
        Self::new(StreamKind::ALL.into_iter().map(StreamKind::build).collect())
    }
}

impl StreamRegistry {
    /// Create a registry from pre-built streams (parents first)
    pub fn new(streams: Vec<Stream>) -> Self {
        Self { streams }
    }

    /// Iterate over all streams
    pub fn iter(&self) -> impl Iterator<Item = &Stream> {
        self.streams.iter()
    }

    /// Look up a stream by name
    pub fn get(&self, name: &str) -> Option<&Stream> {
        self.streams.iter().find(|s| s.name() == name)
    }

    /// Streams without a parent
    pub fn roots(&self) -> impl Iterator<Item = &Stream> {
        self.streams
            .iter()
            .filter(|s| s.definition.parent.is_none())
    }

    /// Direct children of a stream
    pub fn children<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a Stream> + 'a {
        self.streams
            .iter()
            .filter(move |s| s.definition.parent_stream() == Some(parent))
    }

    /// Resolve the selected stream names
    ///
    /// With no explicit names, streams selected by default are used. Unknown
    /// names are a configuration error.
    pub fn selection(&self, names: Option<&[String]>) -> Result<BTreeSet<String>> {
        match names {
            Some(names) if !names.is_empty() => names
                .iter()
                .map(|name| {
                    self.get(name)
                        .map(|s| s.name().to_string())
                        .ok_or_else(|| Error::config(format!("Unknown stream: {name}")))
                })
                .collect(),
            _ => Ok(self
                .streams
                .iter()
                .filter(|s| s.definition.selected_by_default)
                .map(|s| s.name().to_string())
                .collect()),
        }
    }

    /// Whether a stream has to run for the selection
    ///
    /// A stream runs when it is selected itself or when a descendant is,
    /// since child runs are driven by parent records.
    pub fn requires_run(&self, name: &str, selection: &BTreeSet<String>) -> bool {
        selection.contains(name)
            || self
                .children(name)
                .any(|child| self.requires_run(child.name(), selection))
    }

    /// Discovery catalog of all streams
    pub fn catalog(&self) -> Catalog {
        Catalog {
            streams: self
                .streams
                .iter()
                .map(|s| CatalogEntry::from(&s.definition))
                .collect(),
        }
    }
}

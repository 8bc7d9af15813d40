//! Request context types

use crate::config::TapConfig;
use crate::error::Result;
use crate::pagination::PageCursor;
use crate::partition::ParentContext;
use crate::types::{scalar_to_string, QueryParams};
use serde_json::Value;
use std::fmt;

/// Resolved parameters for one HTTP request
///
/// Built fresh for every request and dropped once the response is handled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    /// Query parameters sent with the request
    pub params: QueryParams,
    /// Parent context for child streams (fills path placeholders)
    pub context: Option<ParentContext>,
}

impl RequestContext {
    /// Create an empty request context
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a parameter value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Set a parameter, replacing any previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Merge parent context values into the parameters
    ///
    /// Keys in `skip` (those consumed by the request path) are not repeated as
    /// query parameters; non-scalar values have no query form and are skipped.
    pub fn merge_context(&mut self, context: Option<&ParentContext>, skip: &[String]) {
        let Some(context) = context else {
            return;
        };
        for (key, value) in context.iter() {
            if skip.contains(key) {
                continue;
            }
            if let Some(value) = scalar_to_string(value) {
                self.params.insert(key.clone(), value);
            }
        }
        self.context = Some(context.clone());
    }
}

/// Builds the request parameters for one stream
pub trait ParameterBuilder: Send + Sync + fmt::Debug {
    /// Build the context for the next request
    ///
    /// `bookmark` is the stored replication value (already `None` for streams
    /// that do not resume), `next_page` is `None` on the first request.
    fn build(
        &self,
        config: &TapConfig,
        bookmark: Option<&Value>,
        context: Option<&ParentContext>,
        next_page: Option<&PageCursor>,
    ) -> Result<RequestContext>;
}

//! Parameter builder implementations

use super::types::{ParameterBuilder, RequestContext};
use crate::config::TapConfig;
use crate::error::{Error, Result};
use crate::pagination::PageCursor;
use crate::partition::ParentContext;
use crate::types::scalar_to_string;
use serde_json::Value;
use tracing::debug;

// ============================================================================
// Survey Responses
// ============================================================================

/// Parameters for the survey responses endpoint
///
/// Layers, lowest to highest precedence:
/// 1. `limit`, `expand[profile]=all`, the required `id` selector, parent context
/// 2. stored bookmark as the `after` lower bound
/// 3. `created_before` / `created_after` config overrides
/// 4. pagination token as `before`
#[derive(Debug, Clone)]
pub struct SurveyResponseParams {
    /// Context keys consumed by the request path
    path_keys: Vec<String>,
}

impl SurveyResponseParams {
    /// Lower bound parameter
    pub const AFTER: &'static str = "after";
    /// Upper bound / cursor parameter
    pub const BEFORE: &'static str = "before";
    /// Survey selector parameter
    pub const SELECTOR: &'static str = "id";

    /// Create a builder; `path_keys` are context keys used by the path template
    pub fn new(path_keys: Vec<String>) -> Self {
        Self { path_keys }
    }
}

impl ParameterBuilder for SurveyResponseParams {
    fn build(
        &self,
        config: &TapConfig,
        bookmark: Option<&Value>,
        context: Option<&ParentContext>,
        next_page: Option<&PageCursor>,
    ) -> Result<RequestContext> {
        let survey_id = config
            .survey_id()
            .ok_or_else(|| Error::missing_config("survey_id"))?;

        let mut ctx = RequestContext::new();
        ctx.set("limit", config.limit.to_string());
        ctx.set("expand[profile]", "all");
        ctx.set(Self::SELECTOR, survey_id);
        ctx.merge_context(context, &self.path_keys);

        if let Some(start) = bookmark.and_then(scalar_to_string) {
            debug!(after = %start, "Resuming from bookmark");
            ctx.set(Self::AFTER, start);
        }

        if let Some(before) = config.created_before() {
            debug!(before = %before, "Applying created_before override");
            ctx.set(Self::BEFORE, before);
        }
        if let Some(after) = config.created_after() {
            debug!(after = %after, "Applying created_after override");
            ctx.set(Self::AFTER, after);
        }

        if let Some(token) = next_page {
            ctx.set(Self::BEFORE, token.as_str());
        }

        Ok(ctx)
    }
}

// ============================================================================
// Context Only
// ============================================================================

/// Parameters for single-resource child endpoints
///
/// Only the parent context contributes; keys consumed by the path are left out.
#[derive(Debug, Clone, Default)]
pub struct ContextParams {
    /// Context keys consumed by the request path
    path_keys: Vec<String>,
}

impl ContextParams {
    /// Create a builder; `path_keys` are context keys used by the path template
    pub fn new(path_keys: Vec<String>) -> Self {
        Self { path_keys }
    }
}

impl ParameterBuilder for ContextParams {
    fn build(
        &self,
        _config: &TapConfig,
        _bookmark: Option<&Value>,
        context: Option<&ParentContext>,
        _next_page: Option<&PageCursor>,
    ) -> Result<RequestContext> {
        let mut ctx = RequestContext::new();
        ctx.merge_context(context, &self.path_keys);
        Ok(ctx)
    }
}

//! Pagination strategy implementations

use super::types::{PageCursor, PaginationStrategy};
use crate::decode::extract_string;
use serde_json::Value;

/// Path of the cursor in Chameleon list responses
pub const DEFAULT_CURSOR_PATH: &str = "$.cursor.before";

// ============================================================================
// Cursor Pagination
// ============================================================================

/// Response-body cursor pagination
///
/// The token lives at a fixed path in the body, e.g.
/// `{"responses": [...], "cursor": {"before": "5f3c..."}}`. A missing cursor
/// object, a missing or null field, or an empty string all end pagination.
#[derive(Debug, Clone)]
pub struct CursorPaginator {
    /// JSONPath to extract cursor from response
    pub cursor_path: String,
}

impl CursorPaginator {
    /// Create a new cursor paginator
    pub fn new(cursor_path: impl Into<String>) -> Self {
        Self {
            cursor_path: cursor_path.into(),
        }
    }
}

impl Default for CursorPaginator {
    fn default() -> Self {
        Self::new(DEFAULT_CURSOR_PATH)
    }
}

impl PaginationStrategy for CursorPaginator {
    fn next_token(&self, body: &Value) -> Option<PageCursor> {
        extract_string(body, &self.cursor_path).and_then(PageCursor::new)
    }
}

// ============================================================================
// No Pagination
// ============================================================================

/// No pagination - single request
#[derive(Debug, Clone, Default)]
pub struct NoPaginator;

impl PaginationStrategy for NoPaginator {
    fn next_token(&self, _body: &Value) -> Option<PageCursor> {
        None
    }
}

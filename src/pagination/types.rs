//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by all strategies.

use crate::error::{Error, Result};
use serde_json::Value;
use std::fmt;

/// Opaque token identifying the next page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageCursor(String);

impl PageCursor {
    /// Wrap a token; empty tokens are not cursors
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    /// The raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// Fetch another page with this token
    Continue(PageCursor),
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// The token to continue with, if any
    pub fn cursor(&self) -> Option<&PageCursor> {
        match self {
            Self::Continue(cursor) => Some(cursor),
            Self::Done => None,
        }
    }
}

/// Tracks pagination progress for one stream run
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Pages processed so far
    pub pages: u32,
    /// Total records seen so far
    pub total_fetched: u64,
    /// Token used for the most recent request
    pub cursor: Option<PageCursor>,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }
}

/// Strategy that finds the next page token in a response
pub trait PaginationStrategy: Send + Sync + fmt::Debug {
    /// Extract the next token from a raw response body
    ///
    /// Pure function of the response: `None` means there are no further pages.
    fn next_token(&self, body: &Value) -> Option<PageCursor>;

    /// Record a processed page and decide what happens next
    ///
    /// A token equal to the one that produced this page would refetch the same
    /// page forever, so it is reported as an error instead.
    fn advance(
        &self,
        stream: &str,
        body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> Result<NextPage> {
        state.pages += 1;
        state.total_fetched += records_count as u64;

        match self.next_token(body) {
            Some(token) if state.cursor.as_ref() == Some(&token) => {
                state.mark_done();
                Err(Error::PaginationLoop {
                    stream: stream.to_string(),
                    cursor: token.to_string(),
                })
            }
            Some(token) => {
                state.cursor = Some(token.clone());
                Ok(NextPage::Continue(token))
            }
            None => {
                state.mark_done();
                Ok(NextPage::Done)
            }
        }
    }
}

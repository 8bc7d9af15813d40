//! Engine types
//!
//! Configuration, statistics and reporting for the sync engine.

use crate::error::{Error, ErrorKind};
use std::fmt;

/// Lifecycle of one stream driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    /// Nothing fetched yet; the stored bookmark has not been read
    Start,
    /// Ready to issue the next request
    Fetching,
    /// A page was handed out and must be finished before the next fetch
    PageReceived,
    /// All pages exhausted
    Done,
    /// Stopped between pages by an external signal
    Cancelled,
    /// A request-level error ended the run
    Failed,
}

impl DriverPhase {
    /// Check if no further pages will be produced
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Cancelled | Self::Failed)
    }
}

impl fmt::Display for DriverPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "START",
            Self::Fetching => "FETCHING",
            Self::PageReceived => "PAGE_RECEIVED",
            Self::Done => "DONE",
            Self::Cancelled => "CANCELLED",
            Self::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Configuration for sync operation
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    /// Abort the whole run on the first failed stream run
    pub fail_fast: bool,
}

impl SyncConfig {
    /// Create a new sync config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set fail fast mode
    #[must_use]
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Total records emitted
    pub records_synced: usize,
    /// Total pages fetched
    pub pages_fetched: usize,
    /// Root streams that completed
    pub streams_synced: usize,
    /// Child runs started
    pub child_runs: usize,
    /// Parent records whose child context could not be derived
    pub parents_skipped: usize,
    /// Failed stream runs
    pub errors: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add records
    pub fn add_records(&mut self, count: usize) {
        self.records_synced += count;
    }

    /// Add a page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Add a stream
    pub fn add_stream(&mut self) {
        self.streams_synced += 1;
    }

    /// Add a child run
    pub fn add_child_run(&mut self) {
        self.child_runs += 1;
    }

    /// Add a skipped parent record
    pub fn add_parent_skipped(&mut self) {
        self.parents_skipped += 1;
    }

    /// Add an error
    pub fn add_error(&mut self) {
        self.errors += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// A stream run that ended in `FAILED`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFailure {
    /// Stream name
    pub stream: String,
    /// Parent record the run was started for, if a child
    pub parent: Option<String>,
    /// Failure taxonomy kind
    pub kind: ErrorKind,
    /// Error message
    pub message: String,
}

impl StreamFailure {
    /// Record a failure from an error
    pub fn new(stream: impl Into<String>, parent: Option<String>, error: &Error) -> Self {
        Self {
            stream: stream.into(),
            parent,
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    /// Convert into an error for user-visible reporting
    pub fn into_error(self) -> Error {
        Error::StreamFailed {
            stream: self.stream,
            kind: self.kind,
            message: self.message,
        }
    }
}

/// Outcome of a completed (or cancelled) run
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Run statistics
    pub stats: SyncStats,
    /// Stream runs that failed while the run continued
    pub failures: Vec<StreamFailure>,
    /// Whether the run stopped on a cancellation signal
    pub cancelled: bool,
}

impl SyncReport {
    /// Check if every stream run succeeded
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// The most recent failure
    pub fn last_failure(&self) -> Option<&StreamFailure> {
        self.failures.last()
    }

    /// Turn a report with failures into the last failure's error
    pub fn into_result(mut self) -> crate::error::Result<Self> {
        match self.failures.pop() {
            Some(failure) => Err(failure.into_error()),
            None => Ok(self),
        }
    }
}

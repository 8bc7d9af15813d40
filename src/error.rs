//! Error types for tap-chameleon
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Every variant maps onto one [`ErrorKind`], which is what the run harness
//! reports when a stream or the whole run fails.

use std::fmt;
use thiserror::Error;

/// The main error type for tap-chameleon
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("JSONPath error: {message}")]
    JsonPath { message: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Record is missing field '{field}' required by stream '{stream}'")]
    MissingField { stream: String, field: String },

    #[error("Pagination loop detected for stream '{stream}': cursor '{cursor}' repeated")]
    PaginationLoop { stream: String, cursor: String },

    // ============================================================================
    // State Errors
    // ============================================================================
    #[error("State error: {message}")]
    State { message: String },

    #[error("Cannot compare replication key values {left} and {right}")]
    StateComparison { left: String, right: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // Run Errors
    // ============================================================================
    #[error("Stream '{stream}' failed: {message}")]
    StreamFailed {
        stream: String,
        kind: ErrorKind,
        message: String,
    },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Failure taxonomy used for reporting and propagation decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing selector or credential; fatal for the affected stream, never retried
    Configuration,
    /// Network failure or non-2xx response after the retry policy gave up
    Transport,
    /// A parent record lacks the field its child stream depends on
    MissingField,
    /// Two replication key values could not be ordered
    StateComparison,
    /// State file could not be read, parsed or written
    State,
    /// Response body or record path could not be decoded
    Decode,
    /// The API handed back a cursor it had already returned
    Pagination,
    /// Local I/O or output failure
    Io,
}

impl ErrorKind {
    /// Name used in user-visible failure output
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "ConfigurationError",
            ErrorKind::Transport => "TransportError",
            ErrorKind::MissingField => "MissingFieldError",
            ErrorKind::StateComparison => "StateComparisonError",
            ErrorKind::State => "StateError",
            ErrorKind::Decode => "DecodeError",
            ErrorKind::Pagination => "PaginationError",
            ErrorKind::Io => "IoError",
        }
    }

    /// Errors of this kind only affect a single record and never abort a stream
    pub fn is_record_local(&self) -> bool {
        matches!(self, ErrorKind::MissingField | ErrorKind::StateComparison)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing config field error
    pub fn missing_config(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create a missing record field error
    pub fn missing_field(stream: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            stream: stream.into(),
            field: field.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a JSONPath error
    pub fn json_path(message: impl Into<String>) -> Self {
        Self::JsonPath {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Create a state comparison error from the two offending values
    pub fn state_comparison(left: impl fmt::Display, right: impl fmt::Display) -> Self {
        Self::StateComparison {
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Classify this error into the failure taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config { .. }
            | Error::MissingConfigField { .. }
            | Error::InvalidConfigValue { .. }
            | Error::InvalidUrl(_) => ErrorKind::Configuration,
            Error::Http(_)
            | Error::HttpStatus { .. }
            | Error::RateLimited { .. }
            | Error::Timeout { .. } => ErrorKind::Transport,
            Error::JsonParse(_) | Error::JsonPath { .. } | Error::Decode { .. } => {
                ErrorKind::Decode
            }
            Error::MissingField { .. } => ErrorKind::MissingField,
            Error::PaginationLoop { .. } => ErrorKind::Pagination,
            Error::State { .. } => ErrorKind::State,
            Error::StateComparison { .. } => ErrorKind::StateComparison,
            Error::StreamFailed { kind, .. } => *kind,
            Error::Io(_) | Error::Output { .. } | Error::Other(_) | Error::Anyhow(_) => {
                ErrorKind::Io
            }
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504 | 520..=524)
}

/// Result type alias for tap-chameleon
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # tap-chameleon
//!
//! Incremental extractor for Chameleon micro-survey responses.
//!
//! ## Features
//!
//! - **Cursor Pagination**: Walks `cursor.before` tokens until the API runs dry
//! - **Incremental Sync**: Per-stream bookmarks that only ever move forward
//! - **Parent-Child Streams**: Child requests parameterized by parent records
//! - **Retry and Rate Limiting**: Bounded retries with backoff on transient failures
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tap_chameleon::{HttpClient, HttpClientConfig, MemorySink, StateManager, SyncEngine, TapConfig};
//!
//! #[tokio::main]
//! async fn main() -> tap_chameleon::Result<()> {
//!     let config = TapConfig::from_file("config.json")?;
//!     config.validate()?;
//!
//!     let client = HttpClient::with_config(HttpClientConfig::for_tap(&config))?;
//!     let state = StateManager::from_file("state.json")?;
//!     let engine = SyncEngine::new(client, config, state);
//!
//!     let mut sink = MemorySink::new();
//!     let report = engine.run(&mut sink, None).await?;
//!     println!("{} records", report.stats.records_synced);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  SyncEngine: selected streams, checkpoints, failure policy   │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┴───────────────────────────────┐
//! │  StreamDriver: START → FETCHING → PAGE_RECEIVED → DONE       │
//! └──────┬────────────┬─────────────┬─────────────┬──────────────┘
//!        │            │             │             │
//! ┌──────┴─────┬──────┴──────┬──────┴──────┬──────┴──────┐
//! │  Params    │    HTTP     │  Paginate   │  Partition  │
//! ├────────────┼─────────────┼─────────────┼─────────────┤
//! │ Bookmark   │ Retry       │ Cursor      │ Parent      │
//! │ Overrides  │ Rate Limit  │ None        │ Context     │
//! │ Cursor     │ Backoff     │             │             │
//! └────────────┴─────────────┴─────────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types and failure taxonomy
pub mod error;

/// Common types and type aliases
pub mod types;

/// Tap configuration
pub mod config;

/// HTTP client with retry and rate limiting
pub mod http;

/// Response decoding and JSON path extraction
pub mod decode;

/// Request path templates
pub mod template;

/// Pagination strategies
pub mod pagination;

/// Request parameter builders
pub mod params;

/// Parent-child context derivation
pub mod partition;

/// Replication state and bookmarks
pub mod state;

/// Stream definitions and registry
pub mod streams;

/// Output messages and sinks
pub mod output;

/// Stream driver and sync engine
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use types::*;

// Re-export commonly used types
pub use config::TapConfig;
pub use engine::{SyncConfig, SyncEngine, SyncReport};
pub use http::{HttpClient, HttpClientConfig, Transport};
pub use output::{JsonLinesSink, MemorySink, Message, RecordSink};
pub use state::StateManager;
pub use streams::{Catalog, StreamKind, StreamRegistry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! Replication state module
//!
//! Tracks, per stream, the last replication-key value emitted (the bookmark)
//! so the next run only asks the API for newer records.
//!
//! # Overview
//!
//! The state module provides:
//! - `ReplicationState` - Serialized bookmark document, nested and legacy flat shapes
//! - `StateManager` - Shared store with monotonic `set` and atomic `flush`
//! - `compare_replication_values` - Ordering of replication key values

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{compare_replication_values, Bookmark, ReplicationState};

//! State manager implementation
//!
//! Provides the replication state store shared by every stream run, with
//! file persistence through atomic writes.

use super::types::{compare_replication_values, ReplicationState};
use crate::error::{Error, Result};
use serde_json::Value;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Replication state store
///
/// Reads happen once per stream run; writes only ever move a bookmark
/// forward. Persistence happens on [`flush`](Self::flush), which the run
/// harness calls at checkpoints, never on `set`.
#[derive(Debug, Clone)]
pub struct StateManager {
    /// Path to the state file (`None` = in-memory)
    path: Option<PathBuf>,
    /// Current state (shared between clones)
    state: Arc<RwLock<ReplicationState>>,
    /// Whether the state changed since the last flush
    dirty: Arc<AtomicBool>,
}

impl StateManager {
    /// Create a state manager backed by the given path, starting empty
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_state(Some(path.as_ref().to_path_buf()), ReplicationState::new())
    }

    /// Create an in-memory state manager (no file persistence)
    pub fn in_memory() -> Self {
        Self::with_state(None, ReplicationState::new())
    }

    /// Create an in-memory state manager seeded with a state value
    pub fn from_state(state: ReplicationState) -> Self {
        Self::with_state(None, state)
    }

    /// Create a state manager from a file, loading existing state if present
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| Error::State {
                message: format!("Failed to read state file: {e}"),
            })?;
            if contents.trim().is_empty() {
                ReplicationState::new()
            } else {
                serde_json::from_str(&contents).map_err(|e| Error::State {
                    message: format!("Failed to parse state file: {e}"),
                })?
            }
        } else {
            ReplicationState::new()
        };

        Ok(Self::with_state(Some(path), state))
    }

    /// Create an in-memory state manager from inline JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let state: ReplicationState = serde_json::from_str(json).map_err(|e| Error::State {
            message: format!("Failed to parse state JSON: {e}"),
        })?;
        Ok(Self::from_state(state))
    }

    fn with_state(path: Option<PathBuf>, state: ReplicationState) -> Self {
        Self {
            path,
            state: Arc::new(RwLock::new(state)),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stored bookmark for a stream, if any
    pub async fn get(&self, stream: &str) -> Option<Value> {
        let state = self.state.read().await;
        state.replication_value(stream).cloned()
    }

    /// Advance the bookmark for a stream
    ///
    /// The value is stored only if it is not older than the current bookmark.
    /// Values that cannot be compared with the stored one are logged and
    /// skipped. Returns whether the stored value changed.
    pub async fn set(&self, stream: &str, replication_key: &str, value: Value) -> bool {
        if value.is_null() {
            return false;
        }

        let mut state = self.state.write().await;
        if let Some(current) = state.replication_value(stream) {
            match compare_replication_values(&value, current) {
                Ok(Ordering::Less) => {
                    debug!(stream, %value, %current, "Ignoring older replication key value");
                    return false;
                }
                Ok(Ordering::Equal) if has_nested_value(&state, stream) => return false,
                Ok(_) => {}
                Err(e) => {
                    warn!(stream, "Skipping bookmark update: {e}");
                    return false;
                }
            }
        }

        state.set_replication_value(stream, Some(replication_key), value);
        self.dirty.store(true, AtomicOrdering::SeqCst);
        true
    }

    /// Persist the state if it changed since the last flush
    ///
    /// Writes to a temp file first, then renames for atomicity. A no-op for
    /// in-memory stores.
    pub async fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if !self.dirty.load(AtomicOrdering::SeqCst) {
            return Ok(());
        }

        let contents = self.to_json_pretty().await?;

        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::State {
                message: format!("Failed to write state file: {e}"),
            })?;

        tokio::fs::rename(&temp_path, path)
            .await
            .map_err(|e| Error::State {
                message: format!("Failed to rename state file: {e}"),
            })?;

        self.dirty.store(false, AtomicOrdering::SeqCst);
        debug!(path = %path.display(), "State flushed");
        Ok(())
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> ReplicationState {
        self.state.read().await.clone()
    }

    /// Export state as JSON string
    pub async fn to_json(&self) -> Result<String> {
        let state = self.state.read().await;
        serde_json::to_string(&*state).map_err(|e| Error::State {
            message: format!("Failed to serialize state: {e}"),
        })
    }

    /// Export state as pretty-printed JSON string
    pub async fn to_json_pretty(&self) -> Result<String> {
        let state = self.state.read().await;
        serde_json::to_string_pretty(&*state).map_err(|e| Error::State {
            message: format!("Failed to serialize state: {e}"),
        })
    }

    /// Whether there are changes not yet flushed
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(AtomicOrdering::SeqCst)
    }

    /// Get the state file path
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Check if using in-memory mode
    pub fn is_in_memory(&self) -> bool {
        self.path.is_none()
    }
}

/// Whether the stream's bookmark is already in the nested shape
fn has_nested_value(state: &ReplicationState, stream: &str) -> bool {
    state
        .bookmarks
        .get(stream)
        .is_some_and(|b| b.replication_key_value.is_some())
}

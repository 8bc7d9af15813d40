//! Execution engine module
//!
//! Main read loop and stream orchestration.
//!
//! # Overview
//!
//! The engine module provides:
//! - `StreamDriver` - The fetch/emit/advance loop for one stream run
//! - `SyncEngine` - Runs the selected streams and their children in order,
//!   checkpointing state between root streams
//! - `SyncConfig` / `SyncReport` - Failure policy and run outcome
//!
//! Execution is sequential: a root stream runs to completion before the next
//! one starts, and every parent record's child runs complete before the next
//! parent record is emitted.

mod driver;
mod types;

pub use driver::{Page, StreamDriver};
pub use types::{DriverPhase, StreamFailure, SyncConfig, SyncReport, SyncStats};

use crate::config::TapConfig;
use crate::error::Result;
use crate::http::Transport;
use crate::output::{Message, RecordSink};
use crate::partition::ParentContext;
use crate::state::StateManager;
use crate::streams::{Catalog, Stream, StreamRegistry};
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Mutable bookkeeping for one run
struct Run<'s> {
    sink: &'s mut dyn RecordSink,
    selection: BTreeSet<String>,
    schemas_sent: HashSet<String>,
    stats: SyncStats,
    failures: Vec<StreamFailure>,
    cancelled: bool,
}

impl Run<'_> {
    fn record_failure(&mut self, failure: StreamFailure) {
        self.stats.add_error();
        self.failures.push(failure);
    }
}

/// Sync engine for orchestrating data extraction
pub struct SyncEngine {
    /// HTTP transport
    transport: Box<dyn Transport>,
    /// Tap configuration
    config: TapConfig,
    /// State manager
    state: StateManager,
    /// Known streams
    registry: StreamRegistry,
    /// Sync configuration
    sync_config: SyncConfig,
    /// Cancellation signal, checked between pages
    cancel: watch::Receiver<bool>,
}

impl SyncEngine {
    /// Create a new sync engine over the built-in streams
    pub fn new(
        transport: impl Transport + 'static,
        config: TapConfig,
        state: StateManager,
    ) -> Self {
        let (_, cancel) = watch::channel(false);
        Self {
            transport: Box::new(transport),
            config,
            state,
            registry: StreamRegistry::default(),
            sync_config: SyncConfig::default(),
            cancel,
        }
    }

    /// Set sync configuration
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.sync_config = config;
        self
    }

    /// Replace the stream registry
    #[must_use]
    pub fn with_registry(mut self, registry: StreamRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Stop the run between pages once `true` is sent on this channel
    #[must_use]
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Get the state manager
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Get the stream registry
    pub fn registry(&self) -> &StreamRegistry {
        &self.registry
    }

    /// Discovery catalog
    pub fn catalog(&self) -> Catalog {
        self.registry.catalog()
    }

    /// Run the selected streams (default selection when `streams` is `None`)
    ///
    /// Failed stream runs are collected in the report unless `fail_fast` is
    /// set, in which case the first failure is returned after a final
    /// checkpoint.
    pub async fn run(
        &self,
        sink: &mut dyn RecordSink,
        streams: Option<&[String]>,
    ) -> Result<SyncReport> {
        let start = Instant::now();
        let selection = self.registry.selection(streams)?;
        info!(streams = ?selection, "Starting sync");

        let mut run = Run {
            sink,
            selection,
            schemas_sent: HashSet::new(),
            stats: SyncStats::new(),
            failures: Vec::new(),
            cancelled: false,
        };

        let roots: Vec<&Stream> = self
            .registry
            .roots()
            .filter(|s| self.registry.requires_run(s.name(), &run.selection))
            .collect();

        for stream in roots {
            if *self.cancel.borrow() {
                run.cancelled = true;
            }
            if run.cancelled {
                break;
            }

            info!(stream = stream.name(), "Starting stream");
            match self.run_stream(stream, None, &mut run).await {
                Ok(()) => {
                    run.stats.add_stream();
                    info!(stream = stream.name(), "Completed stream");
                }
                Err(e) => {
                    error!(stream = stream.name(), kind = %e.kind(), "Stream failed: {e}");
                    if self.sync_config.fail_fast {
                        self.checkpoint(&mut run).await?;
                        return Err(e);
                    }
                    run.record_failure(StreamFailure::new(stream.name(), None, &e));
                }
            }
            self.checkpoint(&mut run).await?;
        }

        if run.stats.streams_synced + run.failures.len() == 0 {
            self.checkpoint(&mut run).await?;
        }
        if run.cancelled {
            warn!("Sync cancelled");
        }

        run.stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            records = run.stats.records_synced,
            pages = run.stats.pages_fetched,
            failures = run.failures.len(),
            duration_ms = run.stats.duration_ms,
            "Sync finished"
        );

        Ok(SyncReport {
            stats: run.stats,
            failures: run.failures,
            cancelled: run.cancelled,
        })
    }

    /// Run one stream to a terminal phase, including its child runs
    async fn run_stream(
        &self,
        stream: &Stream,
        context: Option<ParentContext>,
        run: &mut Run<'_>,
    ) -> Result<()> {
        let emit = run.selection.contains(stream.name());
        if emit && run.schemas_sent.insert(stream.name().to_string()) {
            run.sink.write(&Message::schema(&stream.definition))?;
        }

        let children: Vec<&Stream> = self
            .registry
            .children(stream.name())
            .filter(|c| self.registry.requires_run(c.name(), &run.selection))
            .collect();

        let mut driver = StreamDriver::new(stream, &self.config, context);
        if !emit {
            driver = driver.without_bookmarks();
        }

        while let Some(page) = driver
            .next_page(self.transport.as_ref(), &self.state, &self.cancel)
            .await?
        {
            run.stats.add_page();

            // Once cancelled, the rest of the page is still emitted but starts
            // no further child runs
            for record in &page.records {
                if emit {
                    run.sink.write(&Message::record(&stream.definition, record.clone()))?;
                    run.stats.add_records(1);
                }
                for child in &children {
                    if run.cancelled {
                        break;
                    }
                    self.run_child(child, record, run).await?;
                }
            }

            if run.cancelled {
                driver.cancel();
                break;
            }
            driver.finish_page(page, &self.state).await?;
        }

        if driver.phase() == DriverPhase::Cancelled {
            run.cancelled = true;
        }
        debug!(stream = stream.name(), phase = %driver.phase(), "Stream run ended");
        Ok(())
    }

    /// Start one child run for a parent record
    ///
    /// A parent record without the field the child needs is skipped; other
    /// child failures are recorded unless `fail_fast` is set.
    async fn run_child(&self, child: &Stream, parent: &Value, run: &mut Run<'_>) -> Result<()> {
        let Some(link) = &child.definition.parent else {
            return Ok(());
        };

        let context = match link.router.derive_context(parent) {
            Ok(context) => context,
            Err(e) => {
                warn!(stream = child.name(), "Skipping parent record: {e}");
                run.stats.add_parent_skipped();
                return Ok(());
            }
        };

        let parent_id = context.id.clone();
        debug!(stream = child.name(), parent = %parent_id, "Starting child run");
        run.stats.add_child_run();

        match Box::pin(self.run_stream(child, Some(context), run)).await {
            Ok(()) => Ok(()),
            Err(e) if self.sync_config.fail_fast => Err(e),
            Err(e) => {
                error!(
                    stream = child.name(),
                    parent = %parent_id,
                    kind = %e.kind(),
                    "Child run failed: {e}"
                );
                run.record_failure(StreamFailure::new(child.name(), Some(parent_id), &e));
                Ok(())
            }
        }
    }

    /// Emit the current state and persist it
    async fn checkpoint(&self, run: &mut Run<'_>) -> Result<()> {
        let value = serde_json::to_value(self.state.snapshot().await)?;
        run.sink.write(&Message::state(value))?;
        run.sink.flush()?;
        self.state.flush().await
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("config", &self.sync_config)
            .field("state", &self.state)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

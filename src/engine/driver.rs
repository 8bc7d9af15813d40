//! Per-stream fetch loop

use super::types::DriverPhase;
use crate::config::TapConfig;
use crate::decode::extract_path;
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::pagination::{NextPage, PageCursor, PaginationState};
use crate::partition::ParentContext;
use crate::state::{compare_replication_values, StateManager};
use crate::streams::Stream;
use crate::template::render_path;
use serde_json::Value;
use std::cmp::Ordering;
use tokio::sync::watch;
use tracing::{debug, warn};

/// One fetched page, handed out by [`StreamDriver::next_page`]
#[derive(Debug)]
pub struct Page {
    /// Records in response order
    pub records: Vec<Value>,
    /// Raw response body, consulted for the next page token
    body: Value,
    /// Newest replication key value on this page
    bookmark: Option<Value>,
}

impl Page {
    /// Newest replication key value on this page
    pub fn bookmark(&self) -> Option<&Value> {
        self.bookmark.as_ref()
    }
}

/// Drives one stream run from `START` to a terminal phase
///
/// Exactly one request is in flight at a time: the caller takes a page with
/// [`next_page`](Self::next_page), emits its records, then hands it back with
/// [`finish_page`](Self::finish_page), which advances the cursor.
///
/// Pages arrive newest first, so page bookmarks are folded into a pending
/// value that reaches the state store only when the run ends in `Done`. A
/// run that ends `Failed` or `Cancelled` leaves the stored bookmark alone.
#[derive(Debug)]
pub struct StreamDriver<'a> {
    stream: &'a Stream,
    config: &'a TapConfig,
    context: Option<ParentContext>,
    track_bookmark: bool,
    bookmark: Option<Value>,
    pending: Option<Value>,
    pagination: PaginationState,
    next: Option<PageCursor>,
    phase: DriverPhase,
}

impl<'a> StreamDriver<'a> {
    /// Create a driver for one run of `stream`
    pub fn new(stream: &'a Stream, config: &'a TapConfig, context: Option<ParentContext>) -> Self {
        Self {
            stream,
            config,
            context,
            track_bookmark: stream.definition.tracks_bookmark(),
            bookmark: None,
            pending: None,
            pagination: PaginationState::new(),
            next: None,
            phase: DriverPhase::Start,
        }
    }

    /// Disable bookmark resume and commit for this run
    #[must_use]
    pub fn without_bookmarks(mut self) -> Self {
        self.track_bookmark = false;
        self
    }

    /// Current phase
    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    /// Newest replication key value seen by this run, not yet committed
    pub fn pending_bookmark(&self) -> Option<&Value> {
        self.pending.as_ref()
    }

    /// Pagination progress so far
    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    /// Stop before the next fetch
    pub fn cancel(&mut self) {
        if !self.phase.is_terminal() {
            self.phase = DriverPhase::Cancelled;
        }
    }

    /// Fetch the next page
    ///
    /// Returns `None` once the driver is in a terminal phase. Cancellation is
    /// checked before each request, never while one is in flight.
    pub async fn next_page(
        &mut self,
        transport: &dyn Transport,
        state: &StateManager,
        cancel: &watch::Receiver<bool>,
    ) -> Result<Option<Page>> {
        match self.phase {
            DriverPhase::Done | DriverPhase::Cancelled | DriverPhase::Failed => return Ok(None),
            DriverPhase::PageReceived => {
                return Err(Error::Other(format!(
                    "Stream '{}' fetched a page before finishing the previous one",
                    self.stream.name()
                )))
            }
            DriverPhase::Start => {
                if self.track_bookmark {
                    self.bookmark = state.get(self.stream.name()).await;
                }
                if let Some(bookmark) = &self.bookmark {
                    debug!(stream = self.stream.name(), %bookmark, "Loaded bookmark");
                }
                self.phase = DriverPhase::Fetching;
            }
            DriverPhase::Fetching => {}
        }

        if *cancel.borrow() {
            debug!(stream = self.stream.name(), "Cancelled before fetch");
            self.phase = DriverPhase::Cancelled;
            return Ok(None);
        }

        match self.fetch(transport).await {
            Ok(page) => {
                self.phase = DriverPhase::PageReceived;
                Ok(Some(page))
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Accept a fully emitted page and advance to the next one
    ///
    /// The pending bookmark is committed once pagination is exhausted.
    pub async fn finish_page(&mut self, page: Page, state: &StateManager) -> Result<()> {
        if let Some(value) = page.bookmark {
            self.pending = newest(self.stream.name(), self.pending.take(), value);
        }

        let next = self.stream.paginator.advance(
            self.stream.name(),
            &page.body,
            page.records.len(),
            &mut self.pagination,
        );

        match next {
            Ok(NextPage::Continue(cursor)) => {
                debug!(stream = self.stream.name(), cursor = %cursor, "Next page");
                self.next = Some(cursor);
                self.phase = DriverPhase::Fetching;
                Ok(())
            }
            Ok(NextPage::Done) => {
                debug!(
                    stream = self.stream.name(),
                    pages = self.pagination.pages,
                    records = self.pagination.total_fetched,
                    "Pagination complete"
                );
                self.commit(state).await;
                self.phase = DriverPhase::Done;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    async fn fetch(&self, transport: &dyn Transport) -> Result<Page> {
        let name = self.stream.name();
        let request = self.stream.params.build(
            self.config,
            self.bookmark.as_ref(),
            self.context.as_ref(),
            self.next.as_ref(),
        )?;
        let path = render_path(name, &self.stream.definition.path, request.context.as_ref())?;

        debug!(
            stream = name,
            page = self.pagination.pages + 1,
            path = %path,
            params = ?request.params,
            "Fetching page"
        );
        let body = transport.get_json(&path, &request.params).await?;
        let records = self.stream.decoder.records(&body)?;

        let bookmark = if self.track_bookmark {
            self.page_bookmark(&records)
        } else {
            None
        };

        debug!(stream = name, records = records.len(), "Page received");
        Ok(Page {
            records,
            body,
            bookmark,
        })
    }

    /// Newest replication key value among the page's records
    fn page_bookmark(&self, records: &[Value]) -> Option<Value> {
        let key = self.stream.definition.replication_key.as_deref()?;
        records
            .iter()
            .filter_map(|r| extract_path(r, key))
            .filter(|v| !v.is_null())
            .fold(None, |acc, value| newest(self.stream.name(), acc, value))
    }

    async fn commit(&mut self, state: &StateManager) {
        let stream = self.stream;
        let (Some(key), Some(value)) = (&stream.definition.replication_key, self.pending.take())
        else {
            return;
        };
        debug!(stream = stream.name(), %value, "Committing bookmark");
        state.set(stream.name(), key, value).await;
    }

    fn fail(&mut self, error: Error) -> Error {
        self.phase = DriverPhase::Failed;
        error
    }
}

/// Keep the newer of the running maximum and `value`
///
/// Values that cannot be ordered against the running maximum are skipped.
fn newest(stream: &str, current: Option<Value>, value: Value) -> Option<Value> {
    let Some(current) = current else {
        return Some(value);
    };
    match compare_replication_values(&value, &current) {
        Ok(Ordering::Greater) => Some(value),
        Ok(_) => Some(current),
        Err(e) => {
            warn!(stream, "Skipping replication key value: {e}");
            Some(current)
        }
    }
}

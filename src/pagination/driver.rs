//! Pagination driver
//!
//! Runs the fetch / emit / advance loop for one collection and exposes the
//! records as a lazy, single-pass stream.
//!
//! ```text
//! START -> FETCHING -> EMITTING -> ADVANCING -> FETCHING | DONE | LOOP_ERROR
//! ```
//!
//! The next cursor is derived as soon as a page arrives, so a page whose
//! cursor repeats the previous one is rejected before any of its records
//! are emitted. `DriverState` itself is only replaced once every record of
//! the current page has been handed out.

use super::link::next_cursor_from_headers;
use super::params::{Cursor, RequestDescriptor, RequestParameterAssembler};
use crate::error::{Error, Result};
use crate::incremental::ReplicationState;
use crate::types::JsonValue;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::header::HeaderMap;
use std::vec::IntoIter;
use tracing::{debug, info, warn};

/// Lazy sequence of extracted records
pub type RecordStream = BoxStream<'static, Result<JsonValue>>;

// ============================================================================
// Page Source
// ============================================================================

/// One fetched page: its records plus the headers needed to find the next one
#[derive(Debug, Clone, Default)]
pub struct PageResult {
    /// Records in response order
    pub records: Vec<JsonValue>,
    /// Raw response headers
    pub headers: HeaderMap,
}

impl PageResult {
    /// Create a page result
    pub fn new(records: Vec<JsonValue>, headers: HeaderMap) -> Self {
        Self { records, headers }
    }

    /// Derive the next cursor from the page's `Link` header
    pub fn next_cursor(&self) -> Result<Option<Cursor>> {
        next_cursor_from_headers(&self.headers)
    }
}

/// Issues one page request.
///
/// Implementations own any retry policy; the driver sees only the final
/// outcome of each request.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page at `path` with the given parameters
    async fn fetch_page(&self, path: &str, params: &RequestDescriptor) -> Result<PageResult>;
}

#[async_trait]
impl<T: PageSource + ?Sized> PageSource for std::sync::Arc<T> {
    async fn fetch_page(&self, path: &str, params: &RequestDescriptor) -> Result<PageResult> {
        (**self).fetch_page(path, params).await
    }
}

// ============================================================================
// Driver State
// ============================================================================

/// Cursor bookkeeping owned by a single running driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverState {
    /// Cursor used for the page before the current one
    pub previous_cursor: Option<Cursor>,
    /// Cursor used for the current page (`None` on the first page)
    pub current_cursor: Option<Cursor>,
    /// 1-based number of the current page
    pub page_count: u32,
}

impl Default for DriverState {
    fn default() -> Self {
        Self::start()
    }
}

/// Outcome of the ADVANCING step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Fetch another page with this state
    Fetch(DriverState),
    /// No further pages
    Done,
}

impl DriverState {
    /// Initial state: no cursors, first page
    pub fn start() -> Self {
        Self {
            previous_cursor: None,
            current_cursor: None,
            page_count: 1,
        }
    }

    /// Move to the next page given the cursor the current page returned.
    ///
    /// Fails with `PaginationLoop` when the new cursor equals the one just used.
    pub fn advance(&self, next_cursor: Option<Cursor>) -> Result<Advance> {
        let previous_cursor = self.current_cursor.clone();

        match next_cursor {
            None => Ok(Advance::Done),
            Some(cursor) if Some(&cursor) == previous_cursor.as_ref() => Err(
                Error::pagination_loop(cursor.as_str(), self.page_count),
            ),
            Some(cursor) => Ok(Advance::Fetch(Self {
                previous_cursor,
                current_cursor: Some(cursor),
                page_count: self.page_count + 1,
            })),
        }
    }
}

// ============================================================================
// Driver
// ============================================================================

/// Drives pagination for one collection
#[derive(Debug)]
pub struct PaginationDriver<S> {
    source: S,
    path: String,
    assembler: RequestParameterAssembler,
    replication_state: Option<ReplicationState>,
}

impl<S: PageSource + 'static> PaginationDriver<S> {
    /// Create a driver for the collection at `path`
    pub fn new(source: S, path: impl Into<String>, assembler: RequestParameterAssembler) -> Self {
        Self {
            source,
            path: path.into(),
            assembler,
            replication_state: None,
        }
    }

    /// Resume from a high-water mark
    #[must_use]
    pub fn with_replication_state(mut self, state: Option<ReplicationState>) -> Self {
        self.replication_state = state;
        self
    }

    /// Collection path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Consume the driver and produce its record stream.
    ///
    /// The stream ends after the last page, or with a single error item on any
    /// fatal condition.
    pub fn into_records(self) -> RecordStream {
        info!(
            path = %self.path,
            since = ?self.replication_state.map(|s| s.to_string()),
            "Starting extraction"
        );
        let run = Run {
            driver: self,
            phase: Phase::Fetching(DriverState::start()),
        };
        stream::unfold(run, Run::next).boxed()
    }

    /// Fetch one page and decide how to advance past it
    async fn fetch(&self, state: &DriverState) -> Result<(Vec<JsonValue>, Advance)> {
        let params = self
            .assembler
            .assemble(state.current_cursor.as_ref(), self.replication_state.as_ref())?;

        debug!(
            path = %self.path,
            page = state.page_count,
            query = %params.to_query_string(),
            "Fetching page"
        );
        let page = self.source.fetch_page(&self.path, &params).await?;
        let next_cursor = page.next_cursor()?;

        let advance = state.advance(next_cursor).inspect_err(|e| {
            warn!(path = %self.path, page = state.page_count, "{e}");
        })?;

        debug!(
            page = state.page_count,
            records = page.records.len(),
            more = matches!(advance, Advance::Fetch(_)),
            "Fetched page"
        );
        Ok((page.records, advance))
    }
}

enum Phase {
    Fetching(DriverState),
    Emitting {
        records: IntoIter<JsonValue>,
        advance: Advance,
        page_count: u32,
    },
    Finished,
}

struct Run<S> {
    driver: PaginationDriver<S>,
    phase: Phase,
}

impl<S: PageSource + 'static> Run<S> {
    async fn next(mut self) -> Option<(Result<JsonValue>, Self)> {
        loop {
            match std::mem::replace(&mut self.phase, Phase::Finished) {
                Phase::Fetching(state) => match self.driver.fetch(&state).await {
                    Ok((records, advance)) => {
                        self.phase = Phase::Emitting {
                            records: records.into_iter(),
                            advance,
                            page_count: state.page_count,
                        };
                    }
                    Err(e) => return Some((Err(e), self)),
                },
                Phase::Emitting {
                    mut records,
                    advance,
                    page_count,
                } => {
                    if let Some(record) = records.next() {
                        self.phase = Phase::Emitting {
                            records,
                            advance,
                            page_count,
                        };
                        return Some((Ok(record), self));
                    }
                    match advance {
                        Advance::Fetch(state) => self.phase = Phase::Fetching(state),
                        Advance::Done => {
                            info!(path = %self.driver.path, pages = page_count, "Extraction complete");
                            return None;
                        }
                    }
                }
                Phase::Finished => return None,
            }
        }
    }
}

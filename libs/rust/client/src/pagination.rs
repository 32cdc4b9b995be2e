//! Pagination cursor over the remote log stream.
//!
//! Forward navigation is speculative: the next page is fetched first and the
//! cursor only moves when it came back non-empty, so an empty page is never
//! displayed. Backward navigation trusts that an already visited offset still
//! has data.

use crate::error::{ClientError, ClientResult};
use crate::model::LogEntry;
use crate::source::LogSource;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// Page currently shown by the log view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    /// Zero-based page index
    pub page_index: usize,
    /// Fixed rows per page
    pub page_size: usize,
    /// Rows of the current page; never more than `page_size`
    pub entries: Vec<LogEntry>,
    /// A navigation fetch is outstanding
    pub loading: bool,
    /// The last speculative fetch past this page came back empty
    pub end_reached: bool,
}

impl PaginationState {
    fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size,
            entries: Vec::new(),
            loading: false,
            end_reached: false,
        }
    }
}

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The cursor moved and shows the new page
    Moved,
    /// The next page is empty; the cursor stayed put
    NoMorePages,
    /// Already on the first page
    AtFirstPage,
    /// Another navigation is still loading; nothing was fetched
    Busy,
}

/// Tracks the current page and its rows.
pub struct PaginationCursor<S> {
    source: Arc<S>,
    state: RwLock<PaginationState>,
    /// Bumped on every committed page change so slow refreshes of the old
    /// page cannot overwrite the new one.
    epoch: AtomicU64,
    lifetime: CancellationToken,
}

impl<S: LogSource> PaginationCursor<S> {
    /// Create a cursor on page 0. Results arriving after `lifetime` is
    /// cancelled are discarded.
    #[must_use]
    pub fn new(source: Arc<S>, page_size: usize, lifetime: CancellationToken) -> Self {
        Self {
            source,
            state: RwLock::new(PaginationState::new(page_size.max(1))),
            epoch: AtomicU64::new(0),
            lifetime,
        }
    }

    /// Snapshot of the cursor state.
    pub async fn state(&self) -> PaginationState {
        self.state.read().await.clone()
    }

    /// Fetch page `index` without touching cursor state.
    ///
    /// # Errors
    ///
    /// Propagates the source's error.
    pub async fn fetch_page(&self, index: usize) -> ClientResult<Vec<LogEntry>> {
        let size = self.state.read().await.page_size;
        let mut entries = self
            .source
            .fetch_logs(size, index.saturating_mul(size))
            .await?;
        entries.truncate(size);
        Ok(entries)
    }

    /// Refetch the current page and replace its rows.
    ///
    /// # Errors
    ///
    /// Returns the fetch error with the displayed rows left intact, or
    /// [`ClientError::Cancelled`] if the page changed or the view closed
    /// while the fetch was in flight.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> ClientResult<()> {
        // Epoch only moves under the write lock, so read both together.
        let (index, epoch) = {
            let state = self.state.read().await;
            (state.page_index, self.epoch.load(Ordering::SeqCst))
        };

        let entries = self.fetch_page(index).await?;

        let mut state = self.state.write().await;
        if self.lifetime.is_cancelled() || self.epoch.load(Ordering::SeqCst) != epoch {
            debug!(index, "Discarding stale page refresh");
            return Err(ClientError::Cancelled);
        }
        state.entries = entries;
        Ok(())
    }

    /// Speculatively advance one page.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the cursor and its rows are unchanged.
    #[instrument(skip(self))]
    pub async fn go_to_next(&self) -> ClientResult<Navigation> {
        let candidate = {
            let mut state = self.state.write().await;
            if state.loading {
                return Ok(Navigation::Busy);
            }
            state.loading = true;
            state.page_index + 1
        };

        let result = self.fetch_page(candidate).await;

        let mut state = self.state.write().await;
        state.loading = false;
        if self.lifetime.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        let entries = result?;
        if entries.is_empty() {
            debug!(candidate, "Speculative fetch empty, staying on page");
            state.end_reached = true;
            return Ok(Navigation::NoMorePages);
        }
        self.commit(&mut state, candidate, entries);
        Ok(Navigation::Moved)
    }

    /// Go back one page. The previous page is not checked for emptiness.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the cursor and its rows are unchanged.
    #[instrument(skip(self))]
    pub async fn go_to_previous(&self) -> ClientResult<Navigation> {
        let candidate = {
            let mut state = self.state.write().await;
            if state.loading {
                return Ok(Navigation::Busy);
            }
            if state.page_index == 0 {
                return Ok(Navigation::AtFirstPage);
            }
            state.loading = true;
            state.page_index - 1
        };

        let result = self.fetch_page(candidate).await;

        let mut state = self.state.write().await;
        state.loading = false;
        if self.lifetime.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        let entries = result?;
        self.commit(&mut state, candidate, entries);
        Ok(Navigation::Moved)
    }

    fn commit(&self, state: &mut PaginationState, index: usize, entries: Vec<LogEntry>) {
        state.page_index = index;
        state.entries = entries;
        state.end_reached = false;
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }
}

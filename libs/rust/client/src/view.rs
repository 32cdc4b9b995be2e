//! Log view: the cursor, the estimator and the error banner of one open view.
//!
//! Every state change is published as a [`LogViewSnapshot`] over a `watch`
//! channel. Renderers subscribe and never touch the cursor directly.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::estimator::TotalEstimator;
use crate::model::TotalEstimate;
use crate::pagination::{Navigation, PaginationCursor, PaginationState};
use crate::source::LogSource;
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Immutable view state handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogViewSnapshot {
    /// Current page
    pub page: PaginationState,
    /// Total count estimate
    pub total: TotalEstimate,
    /// Last failure message, cleared by the next successful page action
    pub banner: Option<String>,
    /// The view was closed
    pub closed: bool,
}

/// One open log view.
pub struct LogView<S> {
    cursor: PaginationCursor<S>,
    estimator: TotalEstimator<S>,
    lifetime: CancellationToken,
    banner: RwLock<Option<String>>,
    updates: watch::Sender<LogViewSnapshot>,
    page_moves: watch::Sender<u64>,
}

impl<S: LogSource> LogView<S> {
    /// Open a view on page 0. Nothing is fetched until the first refresh.
    #[must_use]
    pub fn new(source: Arc<S>, config: &ClientConfig) -> Self {
        let lifetime = CancellationToken::new();
        let cursor = PaginationCursor::new(Arc::clone(&source), config.page_size, lifetime.clone());
        let estimator = TotalEstimator::new(
            source,
            config.page_size,
            config.scan_page_cap,
            lifetime.clone(),
        );
        let (updates, _) = watch::channel(LogViewSnapshot {
            page: PaginationState {
                page_index: 0,
                page_size: config.page_size.max(1),
                entries: Vec::new(),
                loading: false,
                end_reached: false,
            },
            total: TotalEstimate::default(),
            banner: None,
            closed: false,
        });

        Self {
            cursor,
            estimator,
            lifetime,
            banner: RwLock::new(None),
            updates,
            page_moves: watch::channel(0).0,
        }
    }

    /// Subscribe to snapshots.
    pub fn subscribe(&self) -> watch::Receiver<LogViewSnapshot> {
        self.updates.subscribe()
    }

    /// Current state.
    pub async fn snapshot(&self) -> LogViewSnapshot {
        LogViewSnapshot {
            page: self.cursor.state().await,
            total: self.estimator.estimate().await,
            banner: self.banner.read().await.clone(),
            closed: self.lifetime.is_cancelled(),
        }
    }

    /// Refetch the current page.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after recording it in the banner. A discarded
    /// refresh returns [`ClientError::Cancelled`] and leaves the banner alone.
    pub async fn refresh_page(&self) -> ClientResult<()> {
        let result = self.cursor.refresh().await;
        self.settle(result.as_ref().map(|_| ())).await;
        result
    }

    /// Start a new total estimation run.
    pub async fn refresh_total(&self) -> TotalEstimate {
        if self.is_closed() {
            return self.estimator.estimate().await;
        }
        self.publish_estimating();
        let estimate = self.estimator.estimate_total().await;
        self.publish().await;
        estimate
    }

    /// Refresh page and total together.
    ///
    /// # Errors
    ///
    /// Returns the page refresh error; the total is refreshed regardless.
    pub async fn refresh(&self) -> ClientResult<()> {
        let (page, _) = tokio::join!(self.refresh_page(), self.refresh_total());
        page
    }

    /// Advance one page if the next page has rows.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the displayed page is unchanged.
    pub async fn next_page(&self) -> ClientResult<Navigation> {
        self.publish_loading();
        let result = self.cursor.go_to_next().await;
        self.navigated(&result).await;
        result
    }

    /// Go back one page.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the displayed page is unchanged.
    pub async fn previous_page(&self) -> ClientResult<Navigation> {
        self.publish_loading();
        let result = self.cursor.go_to_previous().await;
        self.navigated(&result).await;
        result
    }

    /// Close the view: in-flight scans stop, late results are dropped.
    pub async fn close(&self) {
        if self.lifetime.is_cancelled() {
            return;
        }
        self.lifetime.cancel();
        self.estimator.cancel().await;
        info!("Log view closed");
        self.publish().await;
    }

    /// Whether [`close`](Self::close) was called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    /// Counter of committed page moves.
    ///
    /// A receiver marks the current count as seen; a move made while the
    /// holder is busy elsewhere is still reported by the next `changed()`.
    pub fn page_changes(&self) -> watch::Receiver<u64> {
        self.page_moves.subscribe()
    }

    async fn navigated(&self, result: &ClientResult<Navigation>) {
        match result {
            Ok(Navigation::Busy) => self.publish().await,
            Ok(Navigation::Moved) => {
                debug!("Page changed");
                self.page_moves.send_modify(|moves| *moves += 1);
                self.settle(Ok(())).await;
            }
            Ok(_) => self.settle(Ok(())).await,
            Err(e) => self.settle(Err(e)).await,
        }
    }

    async fn settle(&self, result: Result<(), &ClientError>) {
        match result {
            Ok(()) => *self.banner.write().await = None,
            Err(e) if e.is_cancelled() => {}
            Err(e) => {
                warn!(error = %e, "Log view action failed");
                *self.banner.write().await = Some(e.to_string());
            }
        }
        self.publish().await;
    }

    fn publish_loading(&self) {
        self.updates.send_modify(|s| s.page.loading = true);
    }

    fn publish_estimating(&self) {
        self.updates.send_modify(|s| s.total.computing = true);
    }

    async fn publish(&self) {
        let snapshot = self.snapshot().await;
        self.updates.send_replace(snapshot);
    }
}

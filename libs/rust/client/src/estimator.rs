//! Total log count estimation.
//!
//! The count endpoint is optional and not every service revision has it.
//! When it does not answer, the total is recovered by scanning pages from
//! offset 0 until a short page or the page cap.
//!
//! Runs may overlap (timer, manual refresh, page change). Each run owns a
//! cancellation token and a generation number; starting a run cancels the
//! previous one, and only the newest generation may commit.

use crate::error::{ClientError, ClientResult};
use crate::model::TotalEstimate;
use crate::source::LogSource;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// Outcome of one count computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Count {
    /// Entries counted
    pub value: u64,
    /// The scan stopped at the page cap; `value` is a lower bound
    pub capped: bool,
}

/// Computes and holds the total log count.
pub struct TotalEstimator<S> {
    source: Arc<S>,
    page_size: usize,
    page_cap: usize,
    estimate: RwLock<TotalEstimate>,
    generation: AtomicU64,
    current: RwLock<Option<CancellationToken>>,
    lifetime: CancellationToken,
}

impl<S: LogSource> TotalEstimator<S> {
    /// Create an estimator. Every run is a child of `lifetime`.
    #[must_use]
    pub fn new(source: Arc<S>, page_size: usize, page_cap: usize, lifetime: CancellationToken) -> Self {
        Self {
            source,
            page_size: page_size.max(1),
            page_cap: page_cap.max(1),
            estimate: RwLock::new(TotalEstimate::default()),
            generation: AtomicU64::new(0),
            current: RwLock::new(None),
            lifetime,
        }
    }

    /// Current estimate.
    pub async fn estimate(&self) -> TotalEstimate {
        *self.estimate.read().await
    }

    /// Start a new estimation run, superseding any run in flight.
    ///
    /// Returns the estimate after this run; a run that was cancelled or
    /// superseded returns the estimate untouched.
    #[instrument(skip(self))]
    pub async fn estimate_total(&self) -> TotalEstimate {
        let Some((generation, token)) = self.begin().await else {
            debug!("Estimator closed, skipping run");
            return self.estimate().await;
        };

        let result = tokio::select! {
            biased;
            () = token.cancelled() => Err(ClientError::Cancelled),
            result = self.compute(&token) => result,
        };

        self.commit(generation, &token, result).await
    }

    /// Cancel the run in flight, if any, leaving the value unchanged.
    pub async fn cancel(&self) {
        let mut current = self.current.write().await;
        if let Some(token) = current.take() {
            token.cancel();
            self.generation.fetch_add(1, Ordering::SeqCst);
            self.estimate.write().await.computing = false;
            debug!("Estimation cancelled");
        }
    }

    /// `None` once the lifetime is cancelled; the estimate is then frozen.
    async fn begin(&self) -> Option<(u64, CancellationToken)> {
        // Lock order: current, then estimate.
        let mut current = self.current.write().await;
        if self.lifetime.is_cancelled() {
            return None;
        }
        let token = self.lifetime.child_token();
        if let Some(previous) = current.replace(token.clone()) {
            previous.cancel();
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.estimate.write().await.computing = true;
        Some((generation, token))
    }

    async fn commit(
        &self,
        generation: u64,
        token: &CancellationToken,
        result: ClientResult<Count>,
    ) -> TotalEstimate {
        // Lock order: current, then estimate.
        let mut current = self.current.write().await;
        let mut estimate = self.estimate.write().await;
        if token.is_cancelled() || self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Discarding superseded estimation");
            return *estimate;
        }

        match result {
            Ok(count) => {
                estimate.value = Some(count.value);
                estimate.capped = count.capped;
            }
            Err(ClientError::Cancelled) => {}
            Err(e) => {
                warn!(error = %e, "Total unavailable");
                estimate.value = None;
                estimate.capped = false;
            }
        }
        estimate.computing = false;
        current.take();
        *estimate
    }

    async fn compute(&self, token: &CancellationToken) -> ClientResult<Count> {
        match self.source.count_logs().await {
            Ok(total) => {
                debug!(total, "Count endpoint answered");
                return Ok(Count {
                    value: total,
                    capped: false,
                });
            }
            Err(e) => debug!(error = %e, "Count endpoint unavailable, scanning"),
        }
        self.scan(token).await
    }

    /// Count entries page by page until a short page or the page cap.
    ///
    /// # Errors
    ///
    /// Returns the first fetch error, or [`ClientError::Cancelled`].
    pub async fn scan(&self, token: &CancellationToken) -> ClientResult<Count> {
        let mut total: u64 = 0;
        for page in 0..self.page_cap {
            if token.is_cancelled() {
                return Err(ClientError::Cancelled);
            }
            let entries = self
                .source
                .fetch_logs(self.page_size, page * self.page_size)
                .await?;
            total += entries.len() as u64;
            if entries.len() < self.page_size {
                debug!(total, pages = page + 1, "Scan reached end of stream");
                return Ok(Count {
                    value: total,
                    capped: false,
                });
            }
        }
        warn!(total, page_cap = self.page_cap, "Scan hit page cap");
        Ok(Count {
            value: total,
            capped: true,
        })
    }
}

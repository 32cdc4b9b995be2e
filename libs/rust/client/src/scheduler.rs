//! Periodic refresh of an open log view.
//!
//! The scheduler owns one background task. It refreshes page and total on
//! start, on every interval tick and on [`PollingScheduler::refresh_now`];
//! a page change restarts the total estimation. Stopping the scheduler
//! closes the view, which cancels any scan still running.

use crate::source::LogSource;
use crate::view::LogView;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Handle to a running polling task.
pub struct PollingScheduler {
    shutdown: CancellationToken,
    manual: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl PollingScheduler {
    /// Start polling `view` every `interval`. The first refresh runs at once.
    pub fn start<S>(view: Arc<LogView<S>>, interval: Duration) -> Self
    where
        S: LogSource + 'static,
    {
        let shutdown = CancellationToken::new();
        let manual = Arc::new(Notify::new());

        let task = tokio::spawn(run(
            view,
            interval.max(Duration::from_millis(1)),
            shutdown.clone(),
            Arc::clone(&manual),
        ));
        info!(interval_ms = interval.as_millis(), "Polling started");

        Self {
            shutdown,
            manual,
            task: Some(task),
        }
    }

    /// Refresh page and total now, independent of the timer.
    pub fn refresh_now(&self) {
        self.manual.notify_one();
    }

    /// Whether the polling task is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop polling and wait for the task to close the view.
    pub async fn stop(mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                debug!(error = %e, "Polling task ended abnormally");
            }
        }
        info!("Polling stopped");
    }
}

impl Drop for PollingScheduler {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn run<S>(
    view: Arc<LogView<S>>,
    interval: Duration,
    shutdown: CancellationToken,
    manual: Arc<Notify>,
) where
    S: LogSource + 'static,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut tasks = JoinSet::new();
    let mut page_changes = view.page_changes();

    loop {
        tokio::select! {
            biased;
            () = shutdown.cancelled() => break,
            _ = ticker.tick() => spawn_refresh(&mut tasks, &view),
            () = manual.notified() => {
                debug!("Manual refresh");
                spawn_refresh(&mut tasks, &view);
            }
            Ok(()) = page_changes.changed() => {
                debug!(moves = *page_changes.borrow(), "Page changed, re-estimating");
                let view = Arc::clone(&view);
                tasks.spawn(async move {
                    view.refresh_total().await;
                });
            }
        }
        while tasks.try_join_next().is_some() {}
    }

    view.close().await;
    tasks.shutdown().await;
}

fn spawn_refresh<S>(tasks: &mut JoinSet<()>, view: &Arc<LogView<S>>)
where
    S: LogSource + 'static,
{
    let view = Arc::clone(view);
    tasks.spawn(async move {
        // Failures are already on the view's banner.
        let _ = view.refresh().await;
    });
}

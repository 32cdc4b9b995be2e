//! Mock implementations for testing.
//!
//! [`MockLogStore`] stands in for the service's log endpoints. It counts
//! calls, injects failures, and can hold fetches at a gate so tests can
//! cancel work that is provably in flight.

use crate::fixtures::sample_entries;
use securelog_client::{ClientError, ClientResult, LogEntry, LogSource};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{Notify, RwLock};

/// How the mock answers the count endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountMode {
    /// `200 {"total": len}`
    Authoritative,
    /// Fixed total regardless of stored entries
    Fixed(u64),
    /// `404`, as on services without the endpoint
    Unavailable,
    /// `500`
    Failing,
}

/// In-memory log store.
#[derive(Debug)]
pub struct MockLogStore {
    entries: RwLock<Vec<LogEntry>>,
    requests: RwLock<Vec<(usize, usize)>>,
    count_mode: RwLock<CountMode>,
    fetches: AtomicUsize,
    count_calls: AtomicUsize,
    fail_fetches: AtomicBool,
    gate_after: RwLock<Option<usize>>,
    released: AtomicBool,
    release: Notify,
    waiting: AtomicUsize,
}

impl MockLogStore {
    /// Store holding `len` sample entries with the count endpoint answering.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self::with_entries(sample_entries(len))
    }

    /// Store holding `entries`.
    #[must_use]
    pub fn with_entries(entries: Vec<LogEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
            requests: RwLock::new(Vec::new()),
            count_mode: RwLock::new(CountMode::Authoritative),
            fetches: AtomicUsize::new(0),
            count_calls: AtomicUsize::new(0),
            fail_fetches: AtomicBool::new(false),
            gate_after: RwLock::new(None),
            released: AtomicBool::new(false),
            release: Notify::new(),
            waiting: AtomicUsize::new(0),
        }
    }

    /// Builder: set the count endpoint behaviour.
    #[must_use]
    pub fn with_count_mode(mut self, mode: CountMode) -> Self {
        *self.count_mode.get_mut() = mode;
        self
    }

    /// Change the count endpoint behaviour.
    pub async fn set_count_mode(&self, mode: CountMode) {
        *self.count_mode.write().await = mode;
    }

    /// Make every fetch fail with a 500 until reset.
    pub fn set_failing(&self, failing: bool) {
        self.fail_fetches.store(failing, Ordering::SeqCst);
    }

    /// Replace the stored entries.
    pub async fn set_entries(&self, entries: Vec<LogEntry>) {
        *self.entries.write().await = entries;
    }

    /// Append `n` more sample entries.
    pub async fn append(&self, n: usize) {
        let mut entries = self.entries.write().await;
        let start = entries.len();
        entries.extend(sample_entries(start + n).into_iter().skip(start));
    }

    /// Hold every fetch after the first `n` until [`release`](Self::release).
    pub async fn gate_after(&self, n: usize) {
        self.released.store(false, Ordering::SeqCst);
        *self.gate_after.write().await = Some(n);
    }

    /// Stop gating new fetches. Fetches already held stay held until
    /// [`release`](Self::release).
    pub async fn stop_gating(&self) {
        *self.gate_after.write().await = None;
    }

    /// Let gated fetches continue.
    pub fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
        self.release.notify_waiters();
    }

    /// Fetches currently held at the gate.
    #[must_use]
    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    /// Wait until at least one fetch is held at the gate.
    pub async fn wait_until_gated(&self) {
        while self.waiting() == 0 {
            tokio::task::yield_now().await;
        }
    }

    /// Log-list calls so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Count endpoint calls so far.
    #[must_use]
    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    /// `(size, offset)` of every log-list call, in order.
    pub async fn requests(&self) -> Vec<(usize, usize)> {
        self.requests.read().await.clone()
    }

    async fn pass_gate(&self, call: usize) {
        let Some(limit) = *self.gate_after.read().await else {
            return;
        };
        if call < limit {
            return;
        }
        // Dropped fetches (cancelled callers) must leave the gate too.
        let _held = Held::enter(&self.waiting);
        loop {
            let notified = self.release.notified();
            if self.released.load(Ordering::SeqCst) {
                break;
            }
            notified.await;
        }
    }
}

struct Held<'a>(&'a AtomicUsize);

impl<'a> Held<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for Held<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl LogSource for MockLogStore {
    async fn fetch_logs(&self, size: usize, offset: usize) -> ClientResult<Vec<LogEntry>> {
        let call = self.fetches.fetch_add(1, Ordering::SeqCst);
        self.requests.write().await.push((size, offset));
        self.pass_gate(call).await;

        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(ClientError::server(500, "Internal Server Error"));
        }
        let entries = self.entries.read().await;
        Ok(entries.iter().skip(offset).take(size).cloned().collect())
    }

    async fn count_logs(&self) -> ClientResult<u64> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        match *self.count_mode.read().await {
            CountMode::Authoritative => Ok(self.entries.read().await.len() as u64),
            CountMode::Fixed(total) => Ok(total),
            CountMode::Unavailable => Err(ClientError::server(404, "Not Found")),
            CountMode::Failing => Err(ClientError::server(500, "count query failed")),
        }
    }
}

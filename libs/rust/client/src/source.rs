//! Log fetch primitive shared by the pagination cursor and the total estimator.
//!
//! Uses native async traits (Rust 2024).

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::model::LogEntry;
use crate::normalize::into_server_error;
use serde::Deserialize;
use std::future::Future;
use tracing::{debug, instrument};

const LOGS_PATH: &str = "api/v1/logs";
const COUNT_PATH: &str = "api/v1/logs/count";

/// Read access to the remote log stream.
pub trait LogSource: Send + Sync {
    /// Fetch up to `size` entries starting at `offset`.
    fn fetch_logs(
        &self,
        size: usize,
        offset: usize,
    ) -> impl Future<Output = ClientResult<Vec<LogEntry>>> + Send;

    /// Ask the count endpoint for the total.
    ///
    /// Any error means "no authoritative count"; callers fall back to scanning.
    fn count_logs(&self) -> impl Future<Output = ClientResult<u64>> + Send;
}

#[derive(Deserialize)]
struct CountResponse {
    total: u64,
}

/// [`LogSource`] backed by the service's HTTP endpoints.
#[derive(Debug, Clone)]
pub struct HttpLogSource {
    api: ApiClient,
}

impl HttpLogSource {
    /// Create a source over an API client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl LogSource for HttpLogSource {
    #[instrument(skip(self))]
    async fn fetch_logs(&self, size: usize, offset: usize) -> ClientResult<Vec<LogEntry>> {
        let query = [("size", size.to_string()), ("offset", offset.to_string())];
        let raw = self.api.get(LOGS_PATH, &query).await?;
        if !raw.is_success() {
            return Err(into_server_error(&raw));
        }

        let mut entries: Vec<LogEntry> = serde_json::from_str(&raw.body)
            .map_err(|e| ClientError::Decode(format!("log list: {e}")))?;
        if entries.len() > size {
            debug!(returned = entries.len(), size, "Server returned an oversized page");
            entries.truncate(size);
        }
        Ok(entries)
    }

    #[instrument(skip(self))]
    async fn count_logs(&self) -> ClientResult<u64> {
        let raw = self.api.get(COUNT_PATH, &[]).await?;
        if raw.status != 200 {
            return Err(into_server_error(&raw));
        }
        let count: CountResponse = serde_json::from_str(&raw.body)
            .map_err(|e| ClientError::Decode(format!("log count: {e}")))?;
        Ok(count.total)
    }
}

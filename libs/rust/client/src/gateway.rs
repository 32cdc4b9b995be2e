//! Crypto request gateway for the encrypt and decrypt endpoints.

use crate::api::ApiClient;
use crate::model::{Operation, RequestOutcome};
use crate::normalize::normalize_result;
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Request body for both crypto endpoints.
#[derive(Serialize)]
struct KeyData<'a> {
    key: &'a str,
    data: &'a str,
}

/// Issues encrypt/decrypt requests and normalizes every response.
///
/// Requests are sent exactly once; failures are reported, never retried.
#[derive(Debug, Clone)]
pub struct CryptoGateway {
    api: ApiClient,
}

impl CryptoGateway {
    /// Create a gateway over an API client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Submit an operation. Empty key or data is rejected without a request.
    #[instrument(skip(self, key, data), fields(operation = %operation, data_len = data.len()))]
    pub async fn submit(&self, operation: Operation, key: &str, data: &str) -> RequestOutcome {
        if key.trim().is_empty() || data.is_empty() {
            return RequestOutcome::failure("Key and data are required");
        }

        let body = KeyData { key, data };
        let outcome = normalize_result(operation, self.api.post_json(operation.path(), &body).await);

        match &outcome {
            RequestOutcome::Success { payload } => {
                info!(payload_len = payload.len(), "Request succeeded");
            }
            RequestOutcome::Failure { message } => warn!(%message, "Request failed"),
        }
        outcome
    }

    /// Encrypt `data` under `key`.
    pub async fn encrypt(&self, key: &str, data: &str) -> RequestOutcome {
        self.submit(Operation::Encrypt, key, data).await
    }

    /// Decrypt `data` with `key`.
    pub async fn decrypt(&self, key: &str, data: &str) -> RequestOutcome {
        self.submit(Operation::Decrypt, key, data).await
    }
}

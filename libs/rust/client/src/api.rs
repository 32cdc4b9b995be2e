//! HTTP access to the secure-log service.
//!
//! Returns status and body untouched; interpreting them is the job of the
//! normalizer and the individual components.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::normalize::RawResponse;
use reqwest::Client;
use securelog_common::{CommonError, build_http_client};
use serde::Serialize;
use tracing::debug;
use url::Url;

/// Thin HTTP client bound to a service base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = build_http_client(&config.http).map_err(CommonError::from)?;
        Ok(Self::with_client(http, config.base_url.clone()))
    }

    /// Wrap an existing reqwest client.
    #[must_use]
    pub const fn with_client(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Service base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path against the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be joined.
    pub fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::config(format!("Invalid endpoint {path}: {e}")))
    }

    /// `POST` a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if no response was received.
    pub async fn post_json<B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<RawResponse> {
        let url = self.endpoint(path)?;
        let response = self.http.post(url).json(body).send().await?;
        read(response).await
    }

    /// `GET` with query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if no response was received.
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> ClientResult<RawResponse> {
        let url = self.endpoint(path)?;
        let response = self.http.get(url).query(query).send().await?;
        read(response).await
    }
}

async fn read(response: reqwest::Response) -> ClientResult<RawResponse> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    debug!(status, body_len = body.len(), "Received response");
    Ok(RawResponse { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_resolution_keeps_prefix() {
        let config = ClientConfig::new("https://example.com/securelog").unwrap();
        let api = ApiClient::new(&config).unwrap();
        assert_eq!(
            api.endpoint("api/v1/logs").unwrap().as_str(),
            "https://example.com/securelog/api/v1/logs"
        );
    }

    #[test]
    fn test_endpoint_resolution_at_root() {
        let api = ApiClient::new(&ClientConfig::default()).unwrap();
        assert_eq!(
            api.endpoint("api/v1/logs/count").unwrap().as_str(),
            "http://localhost:8000/api/v1/logs/count"
        );
    }
}

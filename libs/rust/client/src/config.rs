//! SecureLog client configuration.

use crate::error::{ClientError, ClientResult};
use securelog_common::{HttpConfig, parse_env};
use std::time::Duration;
use url::Url;

/// Rows per page of the log view.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Interval between automatic log view refreshes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Maximum pages the fallback count scan reads before giving up with a lower
/// bound. With the default page size this caps the scan at 5,000 entries.
pub const DEFAULT_SCAN_PAGE_CAP: usize = 200;

const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// SecureLog client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service base URL; API paths are resolved against it
    pub base_url: Url,
    /// Rows per page for the log view and the fallback scan
    pub page_size: usize,
    /// Automatic refresh interval for the log view
    pub poll_interval: Duration,
    /// Page cap for the fallback count scan
    pub scan_page_cap: usize,
    /// HTTP client settings
    pub http: HttpConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: DEFAULT_PAGE_SIZE,
            poll_interval: DEFAULT_POLL_INTERVAL,
            scan_page_cap: DEFAULT_SCAN_PAGE_CAP,
            http: HttpConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed or is not http(s).
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            ..Default::default()
        })
    }

    /// Load configuration from `SECURELOG_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is set but invalid.
    pub fn from_env() -> ClientResult<Self> {
        let base: String = parse_env("SECURELOG_API_BASE", DEFAULT_API_BASE.to_string())?;
        let page_size = parse_env("SECURELOG_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let poll_ms = parse_env("SECURELOG_POLL_INTERVAL_MS", 5000u64)?;
        let scan_page_cap = parse_env("SECURELOG_SCAN_PAGE_CAP", DEFAULT_SCAN_PAGE_CAP)?;
        let timeout_secs = parse_env("SECURELOG_HTTP_TIMEOUT_SECS", 30u64)?;

        let config = Self {
            base_url: parse_base_url(&base)?,
            page_size,
            poll_interval: Duration::from_millis(poll_ms),
            scan_page_cap,
            http: HttpConfig::default().with_timeout(Duration::from_secs(timeout_secs)),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the pagination engine relies on.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero page size, page cap, or poll interval.
    pub fn validate(&self) -> ClientResult<()> {
        if self.page_size == 0 {
            return Err(ClientError::config("page size must be positive"));
        }
        if self.scan_page_cap == 0 {
            return Err(ClientError::config("scan page cap must be positive"));
        }
        if self.poll_interval.is_zero() {
            return Err(ClientError::config("poll interval must be positive"));
        }
        Ok(())
    }

    /// Point at another service base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed or is not http(s).
    pub fn with_base_url(mut self, base_url: &str) -> ClientResult<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    /// Set page size.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the fallback scan page cap.
    #[must_use]
    pub const fn with_scan_page_cap(mut self, cap: usize) -> Self {
        self.scan_page_cap = cap;
        self
    }

    /// Set request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    /// Largest entry count the fallback scan can observe.
    #[must_use]
    pub const fn scan_entry_ceiling(&self) -> usize {
        self.page_size.saturating_mul(self.scan_page_cap)
    }
}

fn default_base_url() -> Url {
    // The literal is a valid absolute URL.
    #[allow(clippy::expect_used)]
    Url::parse(DEFAULT_API_BASE).expect("default base URL is valid")
}

fn parse_base_url(raw: &str) -> ClientResult<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ClientError::config(format!("Invalid SECURELOG_API_BASE {raw:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::config(format!(
            "SECURELOG_API_BASE must be http or https, got {}",
            url.scheme()
        )));
    }
    // A trailing slash makes relative joins keep any path prefix.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

//! Shared harness for SecureLog integration tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use securelog_client::{ClientConfig, ClientResult, LogView};
use securelog_common::{TracingConfig, init_tracing};
use securelog_test_utils::MockLogStore;
use std::sync::{Arc, Once};
use std::time::Duration;

static TRACING: Once = Once::new();

/// Install a test subscriber once per binary. Honors `RUST_LOG`.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        init_tracing(&TracingConfig::default().with_service_name("securelog-integration-tests"));
    });
}

/// Client configuration pointing at `base_url` with short timeouts.
///
/// # Errors
///
/// Returns an error if `base_url` is not an http(s) URL.
pub fn test_config(base_url: &str) -> ClientResult<ClientConfig> {
    Ok(ClientConfig::new(base_url)?.with_timeout(Duration::from_secs(5)))
}

/// A log view over `store` with the default page size and scan cap.
///
/// # Errors
///
/// Returns an error if the default configuration is rejected.
pub fn mock_view(store: &Arc<MockLogStore>) -> ClientResult<LogView<MockLogStore>> {
    let config = test_config("http://localhost:8000")?;
    Ok(LogView::new(Arc::clone(store), &config))
}

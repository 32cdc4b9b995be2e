//! Tracing subscriber initialization.
//!
//! Output goes to stderr so it never interleaves with command output that
//! operators may pipe elsewhere.

use crate::{CommonError, parse_env, parse_env_flag};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Tracing configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Component name attached to the startup event
    pub service_name: String,
    /// Log level filter
    pub log_level: String,
    /// Whether to output JSON format
    pub json_output: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            service_name: "securelog".to_string(),
            log_level: "warn".to_string(),
            json_output: false,
        }
    }
}

impl TracingConfig {
    /// Load `SECURELOG_LOG_LEVEL` and `SECURELOG_LOG_JSON` over the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `SECURELOG_LOG_JSON` is not a boolean.
    pub fn from_env() -> Result<Self, CommonError> {
        let defaults = Self::default();
        Ok(Self {
            log_level: parse_env("SECURELOG_LOG_LEVEL", defaults.log_level.clone())?,
            json_output: parse_env_flag("SECURELOG_LOG_JSON", defaults.json_output)?,
            ..defaults
        })
    }

    /// Create config with custom service name.
    #[must_use]
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    /// Create config with custom log level.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable JSON output.
    #[must_use]
    pub const fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// Initialize tracing with the given configuration.
///
/// `RUST_LOG` takes precedence over the configured level. Should be called
/// once at application startup; later calls are ignored.
pub fn init_tracing(config: &TracingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let result = if config.json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    if result.is_ok() {
        tracing::debug!(service = %config.service_name, "Tracing initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TracingConfig::default();
        assert_eq!(config.service_name, "securelog");
        assert_eq!(config.log_level, "warn");
        assert!(!config.json_output);
    }

    #[test]
    fn test_config_builder() {
        let config = TracingConfig::default()
            .with_service_name("securelog-cli")
            .with_log_level("debug")
            .with_json_output();

        assert_eq!(config.service_name, "securelog-cli");
        assert_eq!(config.log_level, "debug");
        assert!(config.json_output);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        let config = TracingConfig::default();
        init_tracing(&config);
        init_tracing(&config);
    }
}

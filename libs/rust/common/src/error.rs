//! Centralized error types for shared client plumbing.
//!
//! Errors raised here happen before any request reaches the service:
//! configuration that cannot be parsed, or an HTTP client that cannot be built.

use thiserror::Error;

/// Common error type for configuration and client construction.
#[derive(Error, Debug)]
pub enum CommonError {
    /// A configuration value is missing or malformed
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The HTTP client could not be constructed
    #[error("HTTP client build failed: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl CommonError {
    /// Create a configuration error with the given message.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check whether the error came from configuration parsing.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

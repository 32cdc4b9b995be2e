//! Client error types using thiserror 2.0.
//!
//! Classifies failures the way the log view and crypto forms need them:
//! transport problems, server rejections, malformed bodies, and cancellations
//! that must never surface as a banner.

use securelog_common::CommonError;
use thiserror::Error;

/// SecureLog client errors.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network unreachable, connection reset, or timeout
    #[error("{0}")]
    Transport(String),

    /// Non-2xx response; `message` is already normalized for display
    #[error("{message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Human-readable message extracted from the body
        message: String,
    },

    /// A 2xx response whose body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// The operation was superseded or its owner was torn down
    #[error("Operation cancelled")]
    Cancelled,

    /// Local key generation or export failed
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    /// Input rejected before any request was made
    #[error("{0}")]
    InvalidInput(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Shared plumbing error
    #[error(transparent)]
    Common(#[from] CommonError),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Check whether this is a cancellation rather than a real failure.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Check whether the request never produced an HTTP response.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// HTTP status of a server rejection, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a key generation error.
    #[must_use]
    pub fn key_generation(msg: impl Into<String>) -> Self {
        Self::KeyGeneration(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<reqwest::Error> for ClientError {
    /// Transport failures are reported generically; the raw error goes to the
    /// debug log only because it may echo the request URL.
    fn from(err: reqwest::Error) -> Self {
        tracing::debug!(error = %err, "Transport error");
        let message = if err.is_timeout() {
            "Request timed out"
        } else if err.is_connect() {
            "Secure-log service is unreachable"
        } else if err.is_decode() || err.is_body() {
            "Failed to read the response from the secure-log service"
        } else {
            "Network error while contacting the secure-log service"
        };
        Self::Transport(message.to_string())
    }
}

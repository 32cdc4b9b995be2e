//! Shared library for cross-cutting concerns in SecureLog Rust clients.
//!
//! This crate provides centralized implementations for:
//! - Error types for configuration and client construction
//! - HTTP client configuration and building
//! - Environment variable parsing
//! - Tracing subscriber initialization

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod env;
pub mod error;
pub mod http;
pub mod tracing_config;

pub use env::{load_dotenv, parse_env, parse_env_flag};
pub use error::CommonError;
pub use http::{HttpConfig, build_http_client};
pub use tracing_config::{TracingConfig, init_tracing};

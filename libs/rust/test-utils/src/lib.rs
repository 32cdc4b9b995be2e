//! Shared test utilities for SecureLog Rust crates.
//!
//! This crate provides:
//! - Proptest generators for log entries and response bodies
//! - An in-memory log store implementing `LogSource`
//! - Test fixtures with sample data

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use generators::*;
pub use mocks::{CountMode, MockLogStore};

//! Client for the SecureLog encryption and audit-log service.
//!
//! # Features
//! - Local key generation (symmetric keys, RSA-2048 key pairs) with a
//!   one-time private key handoff
//! - Encrypt/decrypt gateway tolerant of several response shapes
//! - Speculative log pagination that never lands on an empty page
//! - Total log count with a count-endpoint fast path and a capped scan
//! - Cancellable periodic refresh of an open log view

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod estimator;
pub mod form;
pub mod gateway;
pub mod keys;
pub mod model;
pub mod normalize;
pub mod pagination;
pub mod scheduler;
pub mod source;
pub mod view;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use estimator::{Count, TotalEstimator};
pub use form::{CryptoForm, FormAction, Submission};
pub use gateway::CryptoGateway;
pub use keys::{
    Clipboard, ClipboardError, KeyHandoff, KeyMaterial, KeyScheme, PrivateKeyDisclosure,
};
pub use model::{LogEntry, LogId, Operation, RequestOutcome, TotalEstimate};
pub use normalize::RawResponse;
pub use pagination::{Navigation, PaginationCursor, PaginationState};
pub use scheduler::PollingScheduler;
pub use source::{HttpLogSource, LogSource};
pub use view::{LogView, LogViewSnapshot};

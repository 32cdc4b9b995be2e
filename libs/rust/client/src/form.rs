//! Crypto form state.
//!
//! One [`CryptoForm`] per operation. All changes go through [`CryptoForm::apply`];
//! the gateway call itself happens outside, between `Submit` and `Completed`.

use crate::gateway::CryptoGateway;
use crate::keys::KeyHandoff;
use crate::model::{Operation, RequestOutcome};
use std::fmt;
use zeroize::Zeroizing;

/// State changes a crypto form accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// Operator edited the key field
    EditKey(String),
    /// Operator edited the data field
    EditData(String),
    /// Generated key text (symmetric key or public PEM) replaces the key field
    KeyGenerated(String),
    /// Operator submitted the form
    Submit,
    /// The gateway answered
    Completed(RequestOutcome),
}

/// A submission the caller should send to the gateway.
#[derive(Clone)]
pub struct Submission {
    /// Operation to run
    pub operation: Operation,
    /// Key field at submit time
    pub key: Zeroizing<String>,
    /// Data field at submit time
    pub data: String,
}

impl fmt::Debug for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submission")
            .field("operation", &self.operation)
            .field("key", &"[REDACTED]")
            .field("data_len", &self.data.len())
            .finish()
    }
}

/// Encrypt or decrypt form state.
#[derive(Clone)]
pub struct CryptoForm {
    operation: Operation,
    key: Zeroizing<String>,
    data: String,
    result: Option<String>,
    banner: Option<String>,
    loading: bool,
}

impl fmt::Debug for CryptoForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoForm")
            .field("operation", &self.operation)
            .field("key", &"[REDACTED]")
            .field("data_len", &self.data.len())
            .field("result", &self.result.is_some())
            .field("banner", &self.banner)
            .field("loading", &self.loading)
            .finish()
    }
}

impl CryptoForm {
    /// Empty form for an operation.
    #[must_use]
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            key: Zeroizing::new(String::new()),
            data: String::new(),
            result: None,
            banner: None,
            loading: false,
        }
    }

    /// Apply an action. Returns the submission to send when the action is an
    /// accepted `Submit`.
    pub fn apply(&mut self, action: FormAction) -> Option<Submission> {
        match action {
            FormAction::EditKey(key) | FormAction::KeyGenerated(key) => {
                self.key = Zeroizing::new(key);
                self.banner = None;
            }
            FormAction::EditData(data) => {
                self.data = data;
                self.banner = None;
            }
            FormAction::Submit => {
                if !self.can_submit() {
                    return None;
                }
                self.loading = true;
                return Some(Submission {
                    operation: self.operation,
                    key: self.key.clone(),
                    data: self.data.clone(),
                });
            }
            FormAction::Completed(outcome) => {
                self.loading = false;
                match outcome {
                    RequestOutcome::Success { payload } => {
                        self.result = Some(payload);
                        self.banner = None;
                    }
                    // The previous result stays visible under the banner.
                    RequestOutcome::Failure { message } => self.banner = Some(message),
                }
            }
        }
        None
    }

    /// Put generated key material in the key field. Only the public half of
    /// an RSA pair ever reaches the form.
    pub fn accept_handoff(&mut self, handoff: &KeyHandoff) {
        self.apply(FormAction::KeyGenerated(handoff.form_key.clone()));
    }

    /// Submit through `gateway` and record the outcome.
    ///
    /// Returns `None` when the form refused to submit (loading, or a field empty).
    pub async fn submit_with(&mut self, gateway: &CryptoGateway) -> Option<RequestOutcome> {
        let submission = self.apply(FormAction::Submit)?;
        let outcome = gateway
            .submit(submission.operation, &submission.key, &submission.data)
            .await;
        self.apply(FormAction::Completed(outcome.clone()));
        Some(outcome)
    }

    /// Whether the submit control is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.key.trim().is_empty() && !self.data.is_empty()
    }

    /// Operation this form drives.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    /// Current key field.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current data field.
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Last successful result.
    #[must_use]
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Current error banner.
    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// A request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }
}

//! Data model shared by the crypto gateway and the log view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Log entry identifier.
///
/// The service has used both UUID strings and integer keys. Identifiers are
/// kept as strings; integers are converted to their decimal form on decode so
/// both revisions hash and compare the same way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LogId(String);

impl LogId {
    /// Create an identifier from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for LogId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for LogId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for LogId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Unsigned(n) => Self(n.to_string()),
            RawId::Signed(n) => Self(n.to_string()),
        })
    }
}

/// A single audit log row as returned by the log-list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Entry identifier
    pub id: LogId,
    /// UNIX seconds
    pub timestamp: i64,
    /// Client address recorded by the service
    #[serde(default)]
    pub ip: Option<String>,
    /// Operation that produced the entry (`encrypt`, `decrypt`)
    #[serde(default)]
    pub action: Option<String>,
    /// Payload recorded with the entry
    #[serde(default)]
    pub data: Option<String>,
}

impl LogEntry {
    /// The entry timestamp as a UTC datetime, if it is in range.
    #[must_use]
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Remote cryptographic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `POST /api/v1/encrypt`
    Encrypt,
    /// `POST /api/v1/decrypt`
    Decrypt,
}

impl Operation {
    /// API path relative to the service base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Encrypt => "api/v1/encrypt",
            Self::Decrypt => "api/v1/decrypt",
        }
    }

    /// Legacy operation-specific result field.
    #[must_use]
    pub const fn legacy_field(self) -> &'static str {
        match self {
            Self::Encrypt => "encrypted_data",
            Self::Decrypt => "decrypted_data",
        }
    }

    /// Lowercase name used in logs and messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical result of an encrypt or decrypt submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The service returned a result payload
    Success {
        /// Ciphertext or plaintext
        payload: String,
    },
    /// The request failed; `message` is ready for display
    Failure {
        /// Normalized error message
        message: String,
    },
}

impl RequestOutcome {
    /// Build a success outcome.
    #[must_use]
    pub fn success(payload: impl Into<String>) -> Self {
        Self::Success {
            payload: payload.into(),
        }
    }

    /// Build a failure outcome.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    /// Whether this is a success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Current knowledge of the total log count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TotalEstimate {
    /// Known total; `None` means unknown, never zero
    pub value: Option<u64>,
    /// `true` when the fallback scan hit its page cap, so `value` is a lower bound
    pub capped: bool,
    /// An estimation run is in flight
    pub computing: bool,
}

impl TotalEstimate {
    /// Label for display: `unknown`, `N`, or `N+` for a capped scan.
    #[must_use]
    pub fn label(&self) -> String {
        match (self.value, self.capped) {
            (None, _) => "unknown".to_string(),
            (Some(n), false) => n.to_string(),
            (Some(n), true) => format!("{n}+"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_entry_with_uuid_id() {
        let json = r#"{"id":"6f1c1b0e-8a53-4d4e-9d1e-0f4f3d2a9b10","timestamp":1700000000,"ip":"10.0.0.1","data":"hello"}"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id.as_str(), "6f1c1b0e-8a53-4d4e-9d1e-0f4f3d2a9b10");
        assert_eq!(entry.action, None);
        assert_eq!(entry.data.as_deref(), Some("hello"));
    }

    #[test]
    fn test_log_entry_with_integer_id() {
        let json = r#"{"id":42,"timestamp":1700000000,"ip":null,"action":"encrypt","data":null}"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, LogId::from(42));
        assert_eq!(entry.ip, None);
        assert_eq!(entry.action.as_deref(), Some("encrypt"));
    }

    #[test]
    fn test_integer_and_string_ids_compare_equal() {
        let from_int: LogId = serde_json::from_str("7").unwrap();
        let from_str: LogId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(from_int, from_str);
    }

    #[test]
    fn test_recorded_at() {
        let entry = LogEntry {
            id: LogId::new("a"),
            timestamp: 0,
            ip: None,
            action: None,
            data: None,
        };
        assert_eq!(entry.recorded_at().map(|t| t.timestamp()), Some(0));
    }

    #[test]
    fn test_operation_fields() {
        assert_eq!(Operation::Encrypt.path(), "api/v1/encrypt");
        assert_eq!(Operation::Decrypt.legacy_field(), "decrypted_data");
        assert_eq!(Operation::Decrypt.to_string(), "decrypt");
    }

    #[test]
    fn test_total_estimate_label() {
        assert_eq!(TotalEstimate::default().label(), "unknown");
        let exact = TotalEstimate { value: Some(53), capped: false, computing: false };
        assert_eq!(exact.label(), "53");
        let capped = TotalEstimate { value: Some(5000), capped: true, computing: true };
        assert_eq!(capped.label(), "5000+");
    }
}

//! Test fixtures with sample data.
//!
//! This module provides pre-built log entries and response bodies in the
//! shapes the service has used across revisions.

use securelog_client::{LogEntry, LogId};
use serde_json::{Value, json};

/// Base timestamp for sample entries (2023-11-14T22:13:20Z).
pub const SAMPLE_EPOCH: i64 = 1_700_000_000;

/// Sample entry `i`: id `i`, one second after the previous entry,
/// alternating encrypt and decrypt.
#[must_use]
pub fn sample_entry(i: usize) -> LogEntry {
    let action = if i % 2 == 0 { "encrypt" } else { "decrypt" };
    LogEntry {
        id: LogId::from(i as u64),
        timestamp: SAMPLE_EPOCH + i as i64,
        ip: Some(format!("10.0.{}.{}", i / 256 % 256, i % 256)),
        action: Some(action.to_string()),
        data: Some(format!("payload-{i}")),
    }
}

/// Entries `0..n`.
#[must_use]
pub fn sample_entries(n: usize) -> Vec<LogEntry> {
    (0..n).map(sample_entry).collect()
}

/// Log-list body for `entries`.
#[must_use]
pub fn log_list_body(entries: &[LogEntry]) -> Value {
    json!(entries)
}

/// Log-list body from the revision that used integer ids and no `action`.
#[must_use]
pub fn legacy_log_list_body(n: usize) -> Value {
    Value::Array(
        (0..n)
            .map(|i| {
                json!({
                    "id": i,
                    "timestamp": SAMPLE_EPOCH + i as i64,
                    "ip": "127.0.0.1",
                    "data": format!("legacy-{i}"),
                })
            })
            .collect(),
    )
}

/// Count endpoint body.
#[must_use]
pub fn count_body(total: u64) -> Value {
    json!({ "total": total })
}

/// Current success shape: `{"data": ...}`.
#[must_use]
pub fn data_body(payload: &str) -> Value {
    json!({ "data": payload })
}

/// Legacy encrypt success shape.
#[must_use]
pub fn encrypted_data_body(payload: &str) -> Value {
    json!({ "encrypted_data": payload })
}

/// Legacy decrypt success shape.
#[must_use]
pub fn decrypted_data_body(payload: &str) -> Value {
    json!({ "decrypted_data": payload })
}

/// `{"detail": message}` error.
#[must_use]
pub fn detail_error_body(message: &str) -> Value {
    json!({ "detail": message })
}

/// `{"error": message}` error.
#[must_use]
pub fn error_field_body(message: &str) -> Value {
    json!({ "error": message })
}

/// Request validation error: `detail` is a list of `{loc, msg, type}`.
#[must_use]
pub fn validation_error_body() -> Value {
    json!({
        "detail": [
            {
                "loc": ["body", "key"],
                "msg": "field required",
                "type": "value_error.missing"
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_entries_are_ordered() {
        let entries = sample_entries(3);
        assert_eq!(entries[2].id, LogId::from(2));
        assert!(entries[0].timestamp < entries[1].timestamp);
        assert_eq!(entries[1].action.as_deref(), Some("decrypt"));
    }

    #[test]
    fn test_legacy_body_decodes() {
        let entries: Vec<LogEntry> = serde_json::from_value(legacy_log_list_body(2)).unwrap();
        assert_eq!(entries[1].id.as_str(), "1");
        assert_eq!(entries[1].action, None);
    }
}

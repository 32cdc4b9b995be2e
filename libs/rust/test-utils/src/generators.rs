//! Shared proptest generators for SecureLog crates.

use proptest::prelude::*;
use securelog_client::{LogEntry, LogId, Operation};
use serde_json::{Value, json};

/// Generate page sizes in the range the service accepts.
pub fn page_size_strategy() -> impl Strategy<Value = usize> {
    1usize..=50
}

/// Generate log store sizes, including empty stores and exact page multiples.
pub fn store_size_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![Just(0usize), Just(25), Just(50), 0usize..300]
}

/// Generate log ids in both wire shapes: UUID-like strings and integers.
pub fn log_id_strategy() -> impl Strategy<Value = LogId> {
    prop_oneof![
        any::<u32>().prop_map(|n| LogId::from(u64::from(n))),
        "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}"
            .prop_map(LogId::new),
    ]
}

/// Generate log entries.
pub fn log_entry_strategy() -> impl Strategy<Value = LogEntry> {
    (
        log_id_strategy(),
        0i64..4_102_444_800,
        proptest::option::of("(25[0-5]|2[0-4][0-9]|1?[0-9]?[0-9])(\\.(25[0-5]|2[0-4][0-9]|1?[0-9]?[0-9])){3}"),
        proptest::option::of(prop_oneof![Just("encrypt".to_string()), Just("decrypt".to_string())]),
        proptest::option::of("[A-Za-z0-9+/=]{0,64}"),
    )
        .prop_map(|(id, timestamp, ip, action, data)| LogEntry {
            id,
            timestamp,
            ip,
            action,
            data,
        })
}

/// Generate an operation.
pub fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![Just(Operation::Encrypt), Just(Operation::Decrypt)]
}

/// Generate non-blank human-readable messages.
pub fn message_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ,.:-]{0,80}".prop_map(|s| s.trim().to_string())
}

/// Generate error bodies paired with the message a client should show.
pub fn error_body_strategy() -> impl Strategy<Value = (Value, String)> {
    (message_strategy(), message_strategy()).prop_flat_map(|(first, second)| {
        prop_oneof![
            Just((json!({ "detail": first }), first.clone())),
            Just((json!({ "error": first }), first.clone())),
            Just((json!({ "error": second, "detail": first }), first.clone())),
            Just((json!({ "detail": [{ "msg": first }] }), first.clone())),
            Just((json!(first), first.clone())),
        ]
    })
}

/// Generate success bodies for `operation` paired with the expected payload.
pub fn success_body_strategy(operation: Operation) -> impl Strategy<Value = (Value, String)> {
    let legacy = operation.legacy_field();
    ("[A-Za-z0-9_-]{1,64}", "[A-Za-z0-9_-]{1,64}").prop_flat_map(move |(data, old)| {
        prop_oneof![
            Just((json!({ "data": data }), data.clone())),
            Just((object(&[(legacy, data.as_str())]), data.clone())),
            Just((object(&[(legacy, old.as_str()), ("data", data.as_str())]), data.clone())),
        ]
    })
}

fn object(fields: &[(&str, &str)]) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(k, v)| ((*k).to_string(), Value::String((*v).to_string())))
            .collect(),
    )
}

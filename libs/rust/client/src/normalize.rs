//! Response normalization.
//!
//! Service revisions disagree on where results and errors live in a response
//! body. Each category has an ordered field list; the first field present wins.

use crate::error::ClientError;
use crate::model::{Operation, RequestOutcome};
use serde_json::Value;

/// Error fields in precedence order. A raw body and then the transport
/// message are consulted after these.
pub const ERROR_FIELDS: [&str; 2] = ["detail", "error"];

/// Keys tried when an error field holds an object or a list of objects.
const NESTED_MESSAGE_FIELDS: [&str; 3] = ["msg", "message", "detail"];

const MAX_RAW_MESSAGE_CHARS: usize = 500;

/// Status and body of an HTTP response, read in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl RawResponse {
    /// Create a raw response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Parse the body as JSON, if it is JSON.
    #[must_use]
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Success fields in precedence order for an operation.
#[must_use]
pub const fn success_fields(operation: Operation) -> [&'static str; 2] {
    ["data", operation.legacy_field()]
}

/// Map a raw response to a canonical outcome.
#[must_use]
pub fn normalize(operation: Operation, raw: &RawResponse) -> RequestOutcome {
    if !raw.is_success() {
        return RequestOutcome::failure(error_message(raw));
    }
    match extract_payload(operation, raw) {
        Some(payload) => RequestOutcome::success(payload),
        None => RequestOutcome::failure(
            ClientError::Decode(truncate(raw.body.trim())).to_string(),
        ),
    }
}

/// Map either a response or a transport failure to a canonical outcome.
#[must_use]
pub fn normalize_result(
    operation: Operation,
    result: Result<RawResponse, ClientError>,
) -> RequestOutcome {
    match result {
        Ok(raw) => normalize(operation, &raw),
        Err(err) => RequestOutcome::failure(err.to_string()),
    }
}

/// Extract the result payload from a 2xx body using the success precedence.
#[must_use]
pub fn extract_payload(operation: Operation, raw: &RawResponse) -> Option<String> {
    let Value::Object(map) = raw.json()? else {
        return None;
    };
    success_fields(operation)
        .iter()
        .find_map(|field| match map.get(*field) {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        })
}

/// Produce a single human-readable message for a non-2xx response.
#[must_use]
pub fn error_message(raw: &RawResponse) -> String {
    match raw.json() {
        Some(Value::Object(map)) => {
            if let Some(msg) = ERROR_FIELDS
                .iter()
                .find_map(|field| map.get(*field).and_then(render_message))
            {
                return msg;
            }
        }
        Some(Value::String(s)) if !s.trim().is_empty() => return truncate(s.trim()),
        _ => {}
    }

    let body = raw.body.trim();
    if body.is_empty() {
        status_message(raw.status)
    } else {
        truncate(body)
    }
}

/// Convert a server error into the error taxonomy.
#[must_use]
pub fn into_server_error(raw: &RawResponse) -> ClientError {
    ClientError::server(raw.status, error_message(raw))
}

fn render_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        // Validation errors arrive as a list of `{loc, msg, type}` objects.
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(render_message).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        Value::Object(map) => NESTED_MESSAGE_FIELDS
            .iter()
            .find_map(|field| map.get(*field).and_then(render_message))
            .or_else(|| (!map.is_empty()).then(|| value.to_string())),
        _ => None,
    }
}

fn status_message(status: u16) -> String {
    let reason = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason());
    match reason {
        Some(reason) => format!("Server error: {status} {reason}"),
        None => format!("Server error: {status}"),
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_RAW_MESSAGE_CHARS {
        return text.to_string();
    }
    let mut out: String = text.chars().take(MAX_RAW_MESSAGE_CHARS).collect();
    out.push('…');
    out
}

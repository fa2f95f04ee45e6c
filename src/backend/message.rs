//! Best-effort extraction of a human-readable message from an error response body.

use serde_json::Value;

/// Pull a message out of a failed response body.
///
/// Order of preference: a JSON string body, a non-empty string `detail` field, the JSON
/// document re-serialized, the raw body text. An empty or `null` body yields an empty string.
pub fn extract_error_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
        return trimmed.to_string();
    };

    match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other
            .get("detail")
            .and_then(Value::as_str)
            .filter(|detail| !detail.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| other.to_string()),
    }
}

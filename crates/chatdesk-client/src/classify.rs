//! Mapping of HTTP error responses to [`ChatError`].

use serde_json::Value;

use chatdesk_core::{ChatError, FieldError, MAX_MESSAGE_LENGTH};

use crate::wire::{ErrorEnvelope, ValidationItem};

/// Retry-after used when neither the body nor the headers carry one.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Classify a non-success response.
///
/// `body` is the raw response body (possibly empty or not JSON);
/// `retry_after_header` is the parsed `Retry-After` header, if any.
pub fn classify_response(status: u16, body: &str, retry_after_header: Option<u64>) -> ChatError {
    let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap_or_default();
    let message = envelope_message(&envelope).unwrap_or_else(|| default_message(status));

    match status {
        401 | 403 => ChatError::Unauthorized(message),
        413 => ChatError::MessageTooLong {
            length: 0,
            max: MAX_MESSAGE_LENGTH,
        },
        400 => ChatError::InvalidInput(message),
        422 => ChatError::Validation {
            message: "Request validation failed".to_string(),
            fields: validation_fields(&envelope),
        },
        429 => ChatError::RateLimited {
            retry_after_secs: envelope_retry_after(&envelope)
                .or(retry_after_header)
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        },
        500..=599 => ChatError::Service { status, message },
        _ => ChatError::Unknown(format!("HTTP {}: {}", status, message)),
    }
}

/// The error detail object, wherever the backend put it.
fn detail(envelope: &ErrorEnvelope) -> Option<&Value> {
    envelope.error.as_ref().or(envelope.detail.as_ref())
}

fn envelope_message(envelope: &ErrorEnvelope) -> Option<String> {
    match detail(envelope)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Object(obj) => obj
            .get("message")
            .or_else(|| obj.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

fn envelope_retry_after(envelope: &ErrorEnvelope) -> Option<u64> {
    let retry_after = detail(envelope)?.get("retry_after")?;
    retry_after
        .as_u64()
        .or_else(|| retry_after.as_f64().map(|secs| secs.ceil().max(0.0) as u64))
        .or_else(|| retry_after.as_str().and_then(|s| s.trim().parse().ok()))
}

fn validation_fields(envelope: &ErrorEnvelope) -> Vec<FieldError> {
    let Some(Value::Array(items)) = detail(envelope) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| serde_json::from_value::<ValidationItem>(item.clone()).ok())
        .map(|item| FieldError {
            field: item
                .loc
                .iter()
                .map(|part| match part {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("."),
            message: item.msg,
        })
        .collect()
}

fn default_message(status: u16) -> String {
    match status {
        401 => "Authentication required",
        403 => "Access forbidden",
        413 => "Request entity too large",
        429 => "Too many requests",
        500..=599 => "Internal server error",
        _ => "Request failed",
    }
    .to_string()
}

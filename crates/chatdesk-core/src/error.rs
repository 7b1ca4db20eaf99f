//! Chat error taxonomy.
//!
//! Every failure surfaced to callers is one of the [`ChatError`] variants.
//! The transport layer classifies raw HTTP and IO failures exactly once;
//! everything above it matches on the variant or on [`ErrorCode`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable error code, as shown to users and written to logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidInput,
    MessageTooLong,
    RateLimited,
    ValidationError,
    Unauthorized,
    Timeout,
    NetworkError,
    ServiceError,
    UnknownError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::MessageTooLong => "MESSAGE_TOO_LONG",
            Self::RateLimited => "RATE_LIMITED",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Timeout => "TIMEOUT",
            Self::NetworkError => "NETWORK_ERROR",
            Self::ServiceError => "SERVICE_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted path of the offending field (e.g. `body.content`).
    pub field: String,
    /// Validation message from the server.
    pub message: String,
}

/// Errors surfaced by the chat client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// Empty or otherwise unusable input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Message exceeds the maximum allowed length.
    #[error("Message is too long ({length} characters, maximum is {max})")]
    MessageTooLong { length: usize, max: usize },

    /// Too many requests, locally or as reported by the server.
    #[error("Rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Server rejected the request body.
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        fields: Vec<FieldError>,
    },

    /// Missing, invalid or expired credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Request did not complete within the transport timeout.
    #[error("Request timed out")]
    Timeout,

    /// Connection could not be established or was interrupted.
    #[error("Network error: {0}")]
    Network(String),

    /// Server-side failure (5xx).
    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// Anything that does not fit the categories above.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ChatError {
    /// Stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
            Self::MessageTooLong { .. } => ErrorCode::MessageTooLong,
            Self::RateLimited { .. } => ErrorCode::RateLimited,
            Self::Validation { .. } => ErrorCode::ValidationError,
            Self::Unauthorized(_) => ErrorCode::Unauthorized,
            Self::Timeout => ErrorCode::Timeout,
            Self::Network(_) => ErrorCode::NetworkError,
            Self::Service { .. } => ErrorCode::ServiceError,
            Self::Unknown(_) => ErrorCode::UnknownError,
        }
    }

    /// Returns true if the transport may retry the request automatically.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Network(_) | Self::Service { .. })
    }

    /// Seconds to wait before retrying, if the error carries one.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }

    /// Message suitable for an error banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(_) => "Please enter a message.".to_string(),
            Self::MessageTooLong { max, .. } => {
                format!("Message is too long. Please keep it under {} characters.", max)
            }
            Self::RateLimited { retry_after_secs } => format!(
                "You're sending messages too quickly. Please wait {}s.",
                retry_after_secs
            ),
            Self::Validation { message, fields } => match fields.first() {
                Some(field) => format!("{} ({}: {})", message, field.field, field.message),
                None => message.clone(),
            },
            Self::Unauthorized(_) => "Your session has expired. Please log in again.".to_string(),
            Self::Timeout => "The request timed out. Please try again.".to_string(),
            Self::Network(_) => {
                "Unable to reach the chat service. Check your connection.".to_string()
            }
            Self::Service { .. } => {
                "The chat service is having trouble. Please try again shortly.".to_string()
            }
            Self::Unknown(_) => "Something went wrong. Please try again.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(ChatError::Timeout.code().as_str(), "TIMEOUT");
        assert_eq!(
            ChatError::MessageTooLong { length: 4001, max: 4000 }.code(),
            ErrorCode::MessageTooLong
        );
        assert_eq!(
            ChatError::Service { status: 503, message: "down".into() }.code().to_string(),
            "SERVICE_ERROR"
        );
    }

    #[test]
    fn test_retryable() {
        assert!(ChatError::Timeout.is_retryable());
        assert!(ChatError::Network("reset".into()).is_retryable());
        assert!(ChatError::Service { status: 500, message: String::new() }.is_retryable());
        assert!(!ChatError::Unauthorized("expired".into()).is_retryable());
        assert!(!ChatError::RateLimited { retry_after_secs: 60 }.is_retryable());
    }

    #[test]
    fn test_user_message_includes_retry_after() {
        let err = ChatError::RateLimited { retry_after_secs: 42 };
        assert_eq!(err.retry_after(), Some(42));
        assert!(err.user_message().contains("42s"));
    }
}

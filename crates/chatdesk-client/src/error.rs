//! Error types for the transport layer.

use chatdesk_core::ChatError;
use thiserror::Error;

/// Failures below the HTTP status level.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Failed to establish or keep the connection.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The request could not be built or sent.
    #[error("request error: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() || err.is_body() || err.is_request() {
            Self::Connection(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<TransportError> for ChatError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => ChatError::Timeout,
            TransportError::Connection(msg) => ChatError::Network(msg),
            TransportError::Request(msg) => ChatError::Unknown(msg),
        }
    }
}

//! Saxo-specific error types.

use thiserror::Error;

use crate::application::ports::GatewayError;

/// Errors from the Saxo adapter.
#[derive(Debug, Error, Clone)]
pub enum SaxoError {
    /// The HTTP client could not be built or a header was invalid.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Request could not be sent or its body not read.
    #[error("Network error: {0}")]
    Network(String),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// The response status was not the one the call treats as success.
    #[error("Unexpected status {status} (expected {expected}): {message}")]
    UnexpectedStatus {
        /// Status received.
        status: u16,
        /// Expected status.
        expected: u16,
        /// Provider error message, or the raw body.
        message: String,
    },

    /// A required response field was missing.
    #[error("Missing field `{0}` in response")]
    MissingField(String),
}

impl From<reqwest::Error> for SaxoError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::JsonParse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<SaxoError> for GatewayError {
    fn from(err: SaxoError) -> Self {
        match err {
            SaxoError::Http(msg) | SaxoError::Network(msg) => Self::Transport(msg),
            SaxoError::JsonParse(msg) => Self::Decode(msg),
            SaxoError::UnexpectedStatus {
                status,
                expected,
                message,
            } => Self::UnexpectedStatus {
                status,
                expected,
                body: message,
            },
            SaxoError::MissingField(field) => {
                Self::Shape(crate::domain::ProtocolShapeError::field(&field))
            }
        }
    }
}

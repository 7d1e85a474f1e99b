//! Error types for backend calls.

use thiserror::Error;

/// Errors that can occur while talking to the backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Non-success response, with the server's error code if it sent one
    #[error("API error: status {status}, {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Machine-readable code from the response body
        code: Option<String>,
        /// Error message
        message: String,
    },

    /// No usable session for an authenticated call
    #[error("session error: {0}")]
    Session(String),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl BackendError {
    /// The server-provided error code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of an API error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<keel_core::KeelError> for BackendError {
    fn from(err: keel_core::KeelError) -> Self {
        match err {
            keel_core::KeelError::Session(msg) => Self::Session(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;

//! Error types.
//!
//! Fetch-layer failures ([`FetchError`]) are captured into the collection state and
//! never cross the controller boundary. [`ApiError`] is what public operations return.

use serde::Serialize;
use thiserror::Error;

/// Classification of a failed fetch, stored next to the error in the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    Auth,
    Server,
}

/// Failure reported by the fetch collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// No response: connectivity failure or timeout.
    #[error("Network error: {0}")]
    Network(String),

    /// Expired or invalid session. Callers should redirect to login.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Non-2xx response from the backend.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// 2xx response whose body is not a page.
    #[error("Malformed page response: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Network(_) => ErrorKind::Network,
            FetchError::Auth(_) => ErrorKind::Auth,
            FetchError::Server { .. } | FetchError::Decode(_) => ErrorKind::Server,
        }
    }
}

/// Errors returned by public operations.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Attempt to mutate a locked or mistyped filter field.
    #[error("Invalid filter field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The controller has been torn down.
    #[error("Collection controller is shut down")]
    ControllerClosed,
}

impl ApiError {
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ApiError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

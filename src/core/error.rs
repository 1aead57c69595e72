// Centralized error types for the portal client

use reqwest::StatusCode;
use thiserror::Error;

/// Fallback text used when the server gives no usable `message`
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Errors raised by persisted session storage
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access session storage: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Session storage lock poisoned")]
    Poisoned,
}

/// Errors raised while building or sending a decorated request
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Invalid header name: {0}")]
    InvalidHeaderName(String),

    #[error("Invalid value for header {0}")]
    InvalidHeaderValue(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Terminal failure of a form submission.
///
/// `Display` yields only the human-readable message so it can be shown as-is.
#[derive(Error, Debug, Clone)]
pub enum SubmitError {
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    InvalidResponse(String),
}

impl SubmitError {
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SubmitError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<RequestError> for SubmitError {
    fn from(err: RequestError) -> Self {
        SubmitError::Network(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum LoginError {
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Login response was not understood: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

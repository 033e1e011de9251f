//! Error types and handling.

use thiserror::Error;

use crate::forms::FieldErrors;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Client-side validation rejected a form before any remote call
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// The directory service rejected the call or could not be reached.
    ///
    /// Carries only the operation name; the underlying detail is logged.
    #[error("Remote operation failed: {0}")]
    RemoteOperationFailed(&'static str),

    /// Login endpoint rejected the credentials
    #[error("{0}")]
    LoginFailed(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Session storage error
    #[error("Session error: {0}")]
    Session(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create a session error with message
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Create a login error with message
    pub fn login_failed(msg: impl Into<String>) -> Self {
        Self::LoginFailed(msg.into())
    }

    /// Field errors if this is a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Core error types for DevMatch
use thiserror::Error;

use crate::validation::FieldErrors;

/// Result type alias using `DevMatchError`
pub type Result<T> = std::result::Result<T, DevMatchError>;

/// Classified failure of an engine operation.
///
/// Every gateway call and every engine operation reports failures through
/// this type, so components can decide between "route to login", "show
/// inline" and "revert and show a notice" without inspecting HTTP details.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DevMatchError {
    /// The session is missing or expired (HTTP 401)
    #[error("Authentication required")]
    AuthRequired,

    /// Local, pre-network validation failure
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// The server rejected the request (4xx other than 401)
    #[error("{0}")]
    Conflict(String),

    /// The call never completed (connect failure, timeout)
    #[error("Server unreachable: {0}")]
    Unreachable(String),

    /// 5xx or a response the client could not make sense of
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Operation invoked in a state that does not allow it
    #[error("Invalid operation: {0}")]
    InvalidState(String),
}

impl DevMatchError {
    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create an invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create a server error
    pub fn server(status: u16, msg: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: msg.into(),
        }
    }

    /// Whether this error means the session is no longer valid
    pub fn is_auth_required(&self) -> bool {
        matches!(self, Self::AuthRequired)
    }

    /// Whether the failure is transient and the same call may succeed later
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unreachable(_) | Self::Server { .. })
    }

    /// Text suitable for a user-visible notification.
    ///
    /// Server-provided messages are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthRequired => "Please login to continue".to_string(),
            Self::Validation(errors) => errors
                .first_message()
                .unwrap_or("Please fix the form errors")
                .to_string(),
            Self::Conflict(message) => message.clone(),
            Self::Unreachable(_) => "Network error. Please try again.".to_string(),
            Self::Server { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Server { .. } => "Something went wrong. Please try again.".to_string(),
            Self::InvalidState(message) => message.clone(),
        }
    }
}

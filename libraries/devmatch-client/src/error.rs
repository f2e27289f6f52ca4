//! Error types for the DevMatch client.

use devmatch_core::DevMatchError;
use thiserror::Error;

/// Errors that can occur when talking to the DevMatch backend.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned a 5xx response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Server refused the request (4xx other than 401)
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Session missing or expired
    #[error("Authentication required")]
    AuthRequired,

    /// Login refused (invalid credentials)
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

impl From<ClientError> for DevMatchError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::AuthRequired => DevMatchError::AuthRequired,
            ClientError::AuthFailed(message) | ClientError::Rejected { message, .. } => {
                DevMatchError::Conflict(message)
            }
            ClientError::ServerError { status, message } => {
                DevMatchError::Server { status, message }
            }
            ClientError::ServerUnreachable(message) => DevMatchError::Unreachable(message),
            // Status 0: a response arrived but could not be used
            ClientError::ParseError(message) => DevMatchError::Server { status: 0, message },
            ClientError::InvalidUrl(message) => DevMatchError::InvalidState(message),
            ClientError::Request(e) => match e.status() {
                Some(status) if status.as_u16() == 401 => DevMatchError::AuthRequired,
                Some(status) => DevMatchError::Server {
                    status: status.as_u16(),
                    message: e.to_string(),
                },
                None => DevMatchError::Unreachable(e.to_string()),
            },
        }
    }
}

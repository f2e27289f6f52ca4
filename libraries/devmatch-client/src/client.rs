//! Main DevMatch client.

use crate::auth::AuthClient;
use crate::error::{ClientError, Result};
use crate::discovery::DiscoveryClient;
use crate::profile::ProfileClient;
use crate::requests::RequestsClient;
use crate::types::ClientConfig;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::warn;

/// Main client for interacting with the DevMatch backend.
///
/// Session credentials are cookies set by the backend on login; the
/// client keeps them in its cookie store and attaches them to every
/// request, so all sub-clients share one session.
///
/// # Example
///
/// ```ignore
/// use devmatch_client::{ClientConfig, DevMatchClient};
///
/// let client = DevMatchClient::new(ClientConfig::new("http://localhost:3001"))?;
/// let me = client.auth().profile_view().await?;
/// let requests = client.requests().received().await?;
/// ```
#[derive(Clone)]
pub struct DevMatchClient {
    http: Client,
    base_url: String,
}

impl DevMatchClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        // Validate URL
        if config.url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        // Parse and normalize URL
        let base_url = config.url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        url::Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(format!("DevMatch/{} (Terminal)", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self { http, base_url })
    }

    /// Get the normalized base URL.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Session operations (login, signup, logout, profile probe).
    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient::new(&self.http, &self.base_url)
    }

    /// Discovery feed operations.
    pub fn discovery(&self) -> DiscoveryClient<'_> {
        DiscoveryClient::new(&self.http, &self.base_url)
    }

    /// Connection request and connection list operations.
    pub fn requests(&self) -> RequestsClient<'_> {
        RequestsClient::new(&self.http, &self.base_url)
    }

    /// Profile edit and deletion.
    pub fn profile(&self) -> ProfileClient<'_> {
        ProfileClient::new(&self.http, &self.base_url)
    }
}

// =============================================================================
// Response handling shared by the sub-clients
// =============================================================================

/// Classify a transport failure (no response received).
pub(crate) fn send_error(e: reqwest::Error) -> ClientError {
    if e.is_connect() || e.is_timeout() {
        ClientError::ServerUnreachable(e.to_string())
    } else {
        ClientError::Request(e)
    }
}

/// Pull a human-readable message out of an error body.
///
/// Prefers a JSON `message`, then a JSON `error`, then the raw text.
pub(crate) fn error_message(body: &str, fallback: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                if !text.trim().is_empty() {
                    return text.to_string();
                }
            }
        }
        if let Some(text) = value.as_str() {
            if !text.trim().is_empty() {
                return text.to_string();
            }
        }
    }

    let body = body.trim();
    if body.is_empty() || body.starts_with('{') || body.starts_with('<') {
        fallback.to_string()
    } else {
        body.to_string()
    }
}

/// Turn a non-success response into a classified error.
pub(crate) async fn error_from_response(response: Response, fallback: &str) -> ClientError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body, fallback);

    if status == StatusCode::UNAUTHORIZED {
        return ClientError::AuthRequired;
    }

    warn!(status = %status, error = %message, "Request failed");

    if status.is_client_error() {
        ClientError::Rejected {
            status: status.as_u16(),
            message,
        }
    } else {
        ClientError::ServerError {
            status: status.as_u16(),
            message,
        }
    }
}

/// Check the status and decode a JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    what: &str,
    fallback: &str,
) -> Result<T> {
    if !response.status().is_success() {
        return Err(error_from_response(response, fallback).await);
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse {}: {}", what, e)))
}

/// Check the status of a call whose body is an acknowledgment only.
pub(crate) async fn expect_success(response: Response, fallback: &str) -> Result<()> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(error_from_response(response, fallback).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation() {
        // Valid URLs
        assert!(DevMatchClient::new(ClientConfig::new("https://example.com")).is_ok());
        assert!(DevMatchClient::new(ClientConfig::new("http://localhost:3001")).is_ok());

        // Invalid URLs
        assert!(DevMatchClient::new(ClientConfig::new("")).is_err());
        assert!(DevMatchClient::new(ClientConfig::new("not-a-url")).is_err());
        assert!(DevMatchClient::new(ClientConfig::new("ftp://example.com")).is_err());
    }

    #[test]
    fn test_url_normalization() {
        let client =
            DevMatchClient::new(ClientConfig::new("https://example.com//")).expect("valid url");
        assert_eq!(client.url(), "https://example.com");
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"message": "Invalid credentials"}"#, "x"), "Invalid credentials");
        assert_eq!(error_message(r#"{"error": "Request not found"}"#, "x"), "Request not found");
        assert_eq!(error_message("ERROR: token missing", "x"), "ERROR: token missing");
        assert_eq!(error_message(r#"{"other": 1}"#, "fallback"), "fallback");
        assert_eq!(error_message("", "fallback"), "fallback");
    }
}

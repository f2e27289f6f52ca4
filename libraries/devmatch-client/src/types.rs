//! Types for DevMatch API requests and responses.

use devmatch_core::{PendingRequest, User};
use serde::{Deserialize, Serialize};

/// Configuration for connecting to a DevMatch backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Base URL of the backend (e.g., "http://localhost:3001")
    pub url: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl ClientConfig {
    /// Create a config with default timeouts.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

// =============================================================================
// Response envelopes
// =============================================================================

/// Body carrying a single user.
///
/// The backend wraps users as `{user}` on some routes and `{data}` or a
/// bare object on others; all three are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum UserEnvelope {
    Wrapped { user: User },
    Data { data: User },
    Bare(User),
}

impl UserEnvelope {
    pub(crate) fn into_user(self) -> User {
        match self {
            UserEnvelope::Wrapped { user } | UserEnvelope::Data { data: user } => user,
            UserEnvelope::Bare(user) => user,
        }
    }
}

/// Response of `GET /feed`.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedResponse {
    #[serde(default)]
    pub data: Vec<User>,
}

/// Response of `GET /user/viewConnections`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionsResponse {
    #[serde(default)]
    pub data: Vec<User>,
}

/// Response of `GET /user/requests/received`.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestsResponse {
    #[serde(default)]
    pub requests: Vec<PendingRequest>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_envelope_shapes() {
        let wrapped: UserEnvelope =
            serde_json::from_str(r#"{"user": {"_id": "a", "firstName": "Al"}}"#).unwrap();
        assert_eq!(wrapped.into_user().first_name, "Al");

        let data: UserEnvelope =
            serde_json::from_str(r#"{"message": "ok", "data": {"_id": "b"}}"#).unwrap();
        assert_eq!(data.into_user().id.as_str(), "b");

        let bare: UserEnvelope = serde_json::from_str(r#"{"_id": "c"}"#).unwrap();
        assert_eq!(bare.into_user().id.as_str(), "c");
    }

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::new("http://localhost:3001");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.connect_timeout_secs, 10);
    }
}

/// Pending connection request
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{RequestId, User};

/// An incoming connection request awaiting review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequest {
    #[serde(rename = "_id")]
    pub id: RequestId,

    /// The user who sent the request (populated by the backend)
    #[serde(rename = "fromUserId")]
    pub sender: User,

    #[serde(rename = "createdAt", default)]
    pub received_at: Option<DateTime<Utc>>,
}

//! Decision vocabularies used in backend paths.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a swipe on a discovery candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    /// Reject the candidate
    Left,
    /// Express interest in the candidate
    Right,
}

impl SwipeDirection {
    /// The request status this swipe is committed as
    pub fn status(self) -> SendStatus {
        match self {
            SwipeDirection::Left => SendStatus::Ignored,
            SwipeDirection::Right => SendStatus::Interested,
        }
    }
}

/// Status sent with `POST /request/send/{status}/{id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendStatus {
    Interested,
    Ignored,
}

impl SendStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SendStatus::Interested => "interested",
            SendStatus::Ignored => "ignored",
        }
    }
}

impl fmt::Display for SendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision sent with `POST /request/review/{status}/{id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Accepted,
    Rejected,
}

impl ReviewDecision {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewDecision::Accepted => "accepted",
            ReviewDecision::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

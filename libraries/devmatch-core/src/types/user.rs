/// User domain type
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::{null_as_default, SkillSet, UserId};

/// Gender as stored by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    PreferNotToSay,
    /// Also absorbs values this client does not know about
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::PreferNotToSay => "prefer not to say",
        }
    }

    /// Parse user input, accepting both spellings of "prefer not to say"
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            "prefer not to say" | "prefer-not-to-say" => Some(Gender::PreferNotToSay),
            _ => None,
        }
    }
}

impl Serialize for Gender {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Gender {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Gender::parse(&value).unwrap_or(Gender::Other))
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user: either the logged-in actor or a discovery candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier
    #[serde(rename = "_id")]
    pub id: UserId,

    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_id: Option<String>,

    /// 18-120 when present
    #[serde(default)]
    pub age: Option<u32>,

    #[serde(default)]
    pub gender: Option<Gender>,

    #[serde(default)]
    pub photo_url: Option<String>,

    /// Free text, at most 200 characters when edited through this client
    #[serde(default, deserialize_with = "null_as_default")]
    pub about: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: SkillSet,

    /// Account creation timestamp
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a user with only identity and name set
    pub fn new(id: UserId, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email_id: None,
            age: None,
            gender: None,
            photo_url: None,
            about: String::new(),
            skills: SkillSet::new(),
            created_at: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

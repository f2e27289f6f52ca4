/// Request bodies built from user input
use serde::Serialize;

use super::{Gender, SkillSet, User};

/// Body of `POST /login`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    pub email_id: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email_id: email_id.into(),
            password: password.into(),
        }
    }
}

/// Body of `POST /signup`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email_id: String,
    pub password: String,
}

/// Editable subset of a [`User`]; also the body of `PATCH /profile/edit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDraft {
    pub first_name: String,
    pub last_name: String,
    pub age: Option<u32>,
    pub gender: Gender,
    /// Empty means "no photo"
    pub photo_url: String,
    pub about: String,
    pub skills: SkillSet,
}

impl ProfileDraft {
    /// Snapshot the editable fields of a committed user
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            age: user.age,
            gender: user.gender.unwrap_or(Gender::Male),
            photo_url: user.photo_url.clone().unwrap_or_default(),
            about: user.about.clone(),
            skills: user.skills.clone(),
        }
    }

    /// Merge the draft into a committed user; identity and creation time stay
    pub fn apply_to(&self, user: &mut User) {
        user.first_name = self.first_name.trim().to_string();
        user.last_name = self.last_name.trim().to_string();
        user.age = self.age;
        user.gender = Some(self.gender);
        user.photo_url = Some(self.photo_url.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_string);
        user.about = self.about.clone();
        user.skills = self.skills.clone();
    }
}

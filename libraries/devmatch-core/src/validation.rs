//! Field validation rules
//!
//! These rules gate state transitions: login, signup and profile saves are
//! refused locally, before any network call, when a rule fails. Messages are
//! user-facing and attributed to the offending field.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;
use url::Url;

use crate::types::{LoginCredentials, ProfileDraft, SignupForm};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;
pub const PASSWORD_MIN_CHARS: usize = 8;
pub const ABOUT_MAX_CHARS: usize = 200;
pub const AGE_MIN: u32 = 18;
pub const AGE_MAX: u32 = 120;

/// A form field an error can be attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    LastName,
    EmailId,
    Password,
    Age,
    Gender,
    PhotoUrl,
    About,
    Skills,
    /// Errors that belong to the form as a whole (server rejections)
    Submit,
}

impl Field {
    /// Wire/form name of the field
    pub fn as_str(self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::EmailId => "emailId",
            Field::Password => "password",
            Field::Age => "age",
            Field::Gender => "gender",
            Field::PhotoUrl => "photoUrl",
            Field::About => "about",
            Field::Skills => "skills",
            Field::Submit => "submit",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Map from field to error message; empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors consisting of a single field
    pub fn single(field: Field, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    /// Message of the first field in form order
    pub fn first_message(&self) -> Option<&str> {
        self.0.values().next().map(String::as_str)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"))
}

/// Loose email shape check: something@something.something
pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value)
}

/// Absolute URL check (scheme required)
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value.trim()).is_ok()
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.is_empty() {
        errors.insert(Field::EmailId, "Email is required");
    } else if !is_valid_email(email) {
        errors.insert(Field::EmailId, "Please enter a valid email");
    }
}

fn check_password(errors: &mut FieldErrors, password: &str) {
    if password.is_empty() {
        errors.insert(Field::Password, "Password is required");
    } else if password.chars().count() < PASSWORD_MIN_CHARS {
        errors.insert(Field::Password, "Password must be at least 8 characters");
    }
}

fn check_required_name(errors: &mut FieldErrors, field: Field, label: &str, value: &str) {
    if value.is_empty() {
        errors.insert(field, format!("{label} is required"));
    } else if value.chars().count() < NAME_MIN_CHARS {
        errors.insert(field, format!("{label} must be at least 2 characters"));
    }
}

fn check_profile_name(errors: &mut FieldErrors, field: Field, label: &str, value: &str) {
    let len = value.trim().chars().count();
    if len < NAME_MIN_CHARS {
        errors.insert(field, format!("{label} must be at least 2 characters"));
    } else if len > NAME_MAX_CHARS {
        errors.insert(field, format!("{label} must be less than 50 characters"));
    }
}

/// Rules for the login form
pub fn validate_login(credentials: &LoginCredentials) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_email(&mut errors, &credentials.email_id);
    check_password(&mut errors, &credentials.password);
    errors
}

/// Rules for the signup form
pub fn validate_signup(form: &SignupForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_required_name(&mut errors, Field::FirstName, "First name", &form.first_name);
    check_required_name(&mut errors, Field::LastName, "Last name", &form.last_name);
    check_email(&mut errors, &form.email_id);
    check_password(&mut errors, &form.password);
    errors
}

/// Rules for a profile edit draft
pub fn validate_profile(draft: &ProfileDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_profile_name(&mut errors, Field::FirstName, "First name", &draft.first_name);
    check_profile_name(&mut errors, Field::LastName, "Last name", &draft.last_name);

    if let Some(age) = draft.age {
        if !(AGE_MIN..=AGE_MAX).contains(&age) {
            errors.insert(Field::Age, "Age must be between 18 and 120");
        }
    }

    if draft.about.chars().count() > ABOUT_MAX_CHARS {
        errors.insert(Field::About, "About section must be less than 200 characters");
    }

    if !draft.photo_url.trim().is_empty() && !is_valid_url(&draft.photo_url) {
        errors.insert(Field::PhotoUrl, "Please enter a valid URL");
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{User, UserId};

    fn draft() -> ProfileDraft {
        ProfileDraft::from_user(&User::new(UserId::new("u1"), "Ada", "Lovelace"))
    }

    #[test]
    fn test_login_rules() {
        let errors = validate_login(&LoginCredentials::new("", ""));
        assert_eq!(errors.get(Field::EmailId), Some("Email is required"));
        assert_eq!(errors.get(Field::Password), Some("Password is required"));

        let errors = validate_login(&LoginCredentials::new("not-an-email", "short"));
        assert_eq!(errors.get(Field::EmailId), Some("Please enter a valid email"));
        assert_eq!(
            errors.get(Field::Password),
            Some("Password must be at least 8 characters")
        );

        assert!(validate_login(&LoginCredentials::new("a@b.io", "longenough")).is_empty());
    }

    #[test]
    fn test_signup_rules() {
        let form = SignupForm {
            first_name: "A".into(),
            last_name: String::new(),
            email_id: "a@b.io".into(),
            password: "longenough".into(),
        };
        let errors = validate_signup(&form);
        assert_eq!(
            errors.get(Field::FirstName),
            Some("First name must be at least 2 characters")
        );
        assert_eq!(errors.get(Field::LastName), Some("Last name is required"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_profile_name_bounds() {
        let mut d = draft();
        d.first_name = "A".into();
        d.last_name = "x".repeat(51);
        let errors = validate_profile(&d);
        assert_eq!(
            errors.get(Field::FirstName),
            Some("First name must be at least 2 characters")
        );
        assert_eq!(
            errors.get(Field::LastName),
            Some("Last name must be less than 50 characters")
        );
    }

    #[test]
    fn test_profile_optional_fields() {
        let mut d = draft();
        d.age = Some(17);
        d.about = "a".repeat(201);
        d.photo_url = "not a url".into();
        let errors = validate_profile(&d);
        assert_eq!(errors.get(Field::Age), Some("Age must be between 18 and 120"));
        assert!(errors.contains(Field::About));
        assert_eq!(errors.get(Field::PhotoUrl), Some("Please enter a valid URL"));

        let mut d = draft();
        d.age = Some(120);
        d.about = "a".repeat(200);
        d.photo_url = "https://cdn.example.com/me.png".into();
        assert!(validate_profile(&d).is_empty());
    }

    #[test]
    fn test_field_errors_serialize_as_map() {
        let errors = FieldErrors::single(Field::FirstName, "bad");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"firstName": "bad"}));
        assert_eq!(errors.to_string(), "firstName: bad");
    }
}

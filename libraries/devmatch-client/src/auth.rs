//! Session endpoints of the DevMatch backend.

use crate::client::{error_message, expect_success, read_json, send_error};
use crate::error::{ClientError, Result};
use crate::types::UserEnvelope;
use devmatch_core::{LoginCredentials, SignupForm, User};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

/// Authentication client for the DevMatch backend.
pub struct AuthClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Fetch the logged-in user's profile.
    ///
    /// Returns `AuthRequired` when no valid session cookie is held.
    pub async fn profile_view(&self) -> Result<User> {
        let url = format!("{}/profile/view", self.base_url);
        debug!(url = %url, "Fetching current profile");

        let response = self.http.get(&url).send().await.map_err(send_error)?;
        let envelope: UserEnvelope =
            read_json(response, "profile", "Failed to load profile").await?;

        Ok(envelope.into_user())
    }

    /// Login with email and password.
    ///
    /// On success the backend sets the session cookie.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User> {
        let url = format!("{}/login", self.base_url);
        debug!(url = %url, email = %credentials.email_id, "Attempting login");

        let response = self
            .http
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(send_error)?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let error_text = response.text().await.unwrap_or_default();
            warn!(error = %error_text, "Login failed: invalid credentials");
            return Err(ClientError::AuthFailed(error_message(
                &error_text,
                "Invalid email or password",
            )));
        }

        let envelope: UserEnvelope =
            read_json(response, "login response", "An error occurred").await?;
        let user = envelope.into_user();

        info!(user_id = %user.id, "Login successful");
        Ok(user)
    }

    /// Create an account.
    ///
    /// The backend does not start a session for the new account.
    pub async fn signup(&self, form: &SignupForm) -> Result<User> {
        let url = format!("{}/signup", self.base_url);
        debug!(url = %url, email = %form.email_id, "Attempting signup");

        let response = self
            .http
            .post(&url)
            .json(form)
            .send()
            .await
            .map_err(send_error)?;

        let envelope: UserEnvelope =
            read_json(response, "signup response", "An error occurred").await?;
        let user = envelope.into_user();

        info!(user_id = %user.id, "Signup successful");
        Ok(user)
    }

    /// End the server-side session.
    pub async fn logout(&self) -> Result<()> {
        let url = format!("{}/logout", self.base_url);
        debug!(url = %url, "Logging out");

        let response = self.http.post(&url).send().await.map_err(send_error)?;
        expect_success(response, "Error during logout").await?;

        info!("Logged out");
        Ok(())
    }
}

//! Profile edit and account deletion.

use crate::client::{expect_success, send_error};
use crate::error::Result;
use devmatch_core::ProfileDraft;
use reqwest::Client;
use tracing::{debug, info};

/// Profile client for the DevMatch backend.
pub struct ProfileClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> ProfileClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Persist the editable profile fields.
    ///
    /// The response body is not interpreted; callers apply their own draft
    /// on success.
    pub async fn edit(&self, draft: &ProfileDraft) -> Result<()> {
        let url = format!("{}/profile/edit", self.base_url);
        debug!(url = %url, "Updating profile");

        let response = self
            .http
            .patch(&url)
            .json(draft)
            .send()
            .await
            .map_err(send_error)?;

        expect_success(response, "Failed to update profile").await?;
        info!("Profile updated");
        Ok(())
    }

    /// Permanently delete the logged-in account.
    pub async fn delete(&self) -> Result<()> {
        let url = format!("{}/profile/delete", self.base_url);
        debug!(url = %url, "Deleting account");

        let response = self.http.delete(&url).send().await.map_err(send_error)?;
        expect_success(response, "Failed to delete account").await?;

        info!("Account deleted");
        Ok(())
    }
}

//! `Gateway` implementation backed by the HTTP client.

use crate::client::DevMatchClient;
use async_trait::async_trait;
use devmatch_core::{
    Gateway, LoginCredentials, PendingRequest, ProfileDraft, RequestId, Result, ReviewDecision,
    SendStatus, SignupForm, User, UserId,
};

#[async_trait]
impl Gateway for DevMatchClient {
    async fn profile_view(&self) -> Result<User> {
        Ok(self.auth().profile_view().await?)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<User> {
        Ok(self.auth().login(credentials).await?)
    }

    async fn signup(&self, form: &SignupForm) -> Result<User> {
        Ok(self.auth().signup(form).await?)
    }

    async fn logout(&self) -> Result<()> {
        Ok(self.auth().logout().await?)
    }

    async fn feed(&self) -> Result<Vec<User>> {
        Ok(self.discovery().get_feed().await?)
    }

    async fn send_request(&self, status: SendStatus, target: &UserId) -> Result<()> {
        Ok(self.discovery().send_request(status, target).await?)
    }

    async fn connections(&self) -> Result<Vec<User>> {
        Ok(self.requests().connections().await?)
    }

    async fn received_requests(&self) -> Result<Vec<PendingRequest>> {
        Ok(self.requests().received().await?)
    }

    async fn review_request(&self, decision: ReviewDecision, request: &RequestId) -> Result<()> {
        Ok(self.requests().review(decision, request).await?)
    }

    async fn update_profile(&self, draft: &ProfileDraft) -> Result<()> {
        Ok(self.profile().edit(draft).await?)
    }

    async fn delete_profile(&self) -> Result<()> {
        Ok(self.profile().delete().await?)
    }
}

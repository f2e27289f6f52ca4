/// Core traits for DevMatch
use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    LoginCredentials, PendingRequest, ProfileDraft, RequestId, ReviewDecision, SendStatus,
    SignupForm, User, UserId,
};

/// Gateway trait
///
/// The sole path through which engine components talk to the backend.
/// Implementers attach the ambient session credentials to every call and
/// classify failures into [`DevMatchError`](crate::DevMatchError):
/// a 401 on any call must surface as `AuthRequired`.
#[async_trait]
pub trait Gateway: Send + Sync {
    // Session

    /// Fetch the profile of the logged-in user (`GET /profile/view`)
    async fn profile_view(&self) -> Result<User>;

    /// Log in and establish a session (`POST /login`)
    async fn login(&self, credentials: &LoginCredentials) -> Result<User>;

    /// Create an account; does not establish a session (`POST /signup`)
    async fn signup(&self, form: &SignupForm) -> Result<User>;

    /// End the server-side session (`POST /logout`)
    async fn logout(&self) -> Result<()>;

    // Discovery

    /// Fetch the next page of candidates (`GET /feed`)
    async fn feed(&self) -> Result<Vec<User>>;

    /// Record a swipe decision on a candidate (`POST /request/send/{status}/{id}`)
    async fn send_request(&self, status: SendStatus, target: &UserId) -> Result<()>;

    // Connections and requests

    /// Fetch accepted connections (`GET /user/viewConnections`)
    async fn connections(&self) -> Result<Vec<User>>;

    /// Fetch pending incoming requests (`GET /user/requests/received`)
    async fn received_requests(&self) -> Result<Vec<PendingRequest>>;

    /// Accept or reject a pending request (`POST /request/review/{status}/{id}`)
    async fn review_request(&self, decision: ReviewDecision, request: &RequestId) -> Result<()>;

    // Profile

    /// Persist the editable profile fields (`PATCH /profile/edit`)
    async fn update_profile(&self, draft: &ProfileDraft) -> Result<()>;

    /// Permanently delete the account (`DELETE /profile/delete`)
    async fn delete_profile(&self) -> Result<()>;
}

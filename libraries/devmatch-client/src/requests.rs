//! Connection request and connection list operations.

use crate::client::{expect_success, read_json, send_error};
use crate::error::Result;
use crate::types::{ConnectionsResponse, RequestsResponse};
use devmatch_core::{PendingRequest, RequestId, ReviewDecision, User};
use reqwest::Client;
use tracing::debug;

/// Requests client for the DevMatch backend.
pub struct RequestsClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> RequestsClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Get all pending requests addressed to the logged-in user.
    pub async fn received(&self) -> Result<Vec<PendingRequest>> {
        let url = format!("{}/user/requests/received", self.base_url);
        debug!(url = %url, "Fetching received requests");

        let response = self.http.get(&url).send().await.map_err(send_error)?;
        let body: RequestsResponse =
            read_json(response, "requests", "Failed to fetch requests").await?;

        debug!(requests = body.requests.len(), "Fetched received requests");
        Ok(body.requests)
    }

    /// Accept or reject a pending request.
    ///
    /// On failure the server's `error` text is carried through unchanged.
    pub async fn review(&self, decision: ReviewDecision, request: &RequestId) -> Result<()> {
        let url = format!("{}/request/review/{}/{}", self.base_url, decision, request);
        debug!(url = %url, decision = %decision, request_id = %request, "Reviewing request");

        let response = self.http.post(&url).send().await.map_err(send_error)?;
        expect_success(response, "Failed to update request").await
    }

    /// Get the accepted connections of the logged-in user.
    pub async fn connections(&self) -> Result<Vec<User>> {
        let url = format!("{}/user/viewConnections", self.base_url);
        debug!(url = %url, "Fetching connections");

        let response = self.http.get(&url).send().await.map_err(send_error)?;
        let body: ConnectionsResponse =
            read_json(response, "connections", "Failed to fetch connections").await?;

        debug!(connections = body.data.len(), "Fetched connections");
        Ok(body.data)
    }
}

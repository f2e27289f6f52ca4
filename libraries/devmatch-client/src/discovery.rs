//! Discovery feed operations for the DevMatch backend.

use crate::client::{expect_success, read_json, send_error};
use crate::error::Result;
use crate::types::FeedResponse;
use devmatch_core::{SendStatus, User, UserId};
use reqwest::Client;
use tracing::debug;

/// Discovery client for the DevMatch backend.
pub struct DiscoveryClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> DiscoveryClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Get the next page of discovery candidates.
    pub async fn get_feed(&self) -> Result<Vec<User>> {
        let url = format!("{}/feed", self.base_url);
        debug!(url = %url, "Fetching feed");

        let response = self.http.get(&url).send().await.map_err(send_error)?;
        let feed: FeedResponse = read_json(response, "feed", "Error fetching feed").await?;

        debug!(candidates = feed.data.len(), "Fetched feed");
        Ok(feed.data)
    }

    /// Record a swipe decision on a candidate.
    pub async fn send_request(&self, status: SendStatus, target: &UserId) -> Result<()> {
        let url = format!("{}/request/send/{}/{}", self.base_url, status, target);
        debug!(url = %url, status = %status, target = %target, "Sending connection request");

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(send_error)?;

        expect_success(response, "Failed to send request").await
    }
}

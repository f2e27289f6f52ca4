//! DevMatch Client
//!
//! HTTP gateway for the DevMatch backend API.
//!
//! # Features
//!
//! - **Session**: login, signup, logout, profile probe (cookie-based credentials)
//! - **Discovery**: feed fetch, swipe decisions
//! - **Requests**: received requests, accept/reject, connections
//! - **Profile**: edit, delete
//!
//! Every failure is classified into [`devmatch_core::DevMatchError`] when the
//! client is used through the [`devmatch_core::Gateway`] trait.
//!
//! # Example
//!
//! ```ignore
//! use devmatch_client::{ClientConfig, DevMatchClient};
//! use devmatch_core::LoginCredentials;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DevMatchClient::new(ClientConfig::new("http://localhost:3001"))?;
//!
//!     // Login stores the session cookie for subsequent requests
//!     let user = client
//!         .auth()
//!         .login(&LoginCredentials::new("ada@example.com", "correct-horse"))
//!         .await?;
//!     println!("Logged in as {}", user.full_name());
//!
//!     let feed = client.discovery().get_feed().await?;
//!     println!("{} candidates", feed.len());
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod client;
mod error;
mod discovery;
mod gateway;
mod profile;
mod requests;
mod types;

// Re-export main types
pub use client::DevMatchClient;
pub use error::{ClientError, Result};
pub use types::{ClientConfig, ConnectionsResponse, FeedResponse, RequestsResponse};

// Re-export sub-clients for direct use if needed
pub use auth::AuthClient;
pub use discovery::DiscoveryClient;
pub use profile::ProfileClient;
pub use requests::RequestsClient;

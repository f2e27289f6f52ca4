//! DevMatch Engine
//!
//! Client application state engine: how local state (session, discovery
//! queue, pending requests, profile draft) changes in response to user
//! actions and asynchronous network results.
//!
//! # Components
//!
//! - **Session Store**: current user, active view, login/signup form state
//! - **Swipe Engine**: optimistic swipe decisions with rollback
//! - **Request Inbox**: per-request accept/decline with action locks
//! - **Connections**: accepted connections with local search
//! - **Profile Editor**: validated draft editing and account deletion
//!
//! All network access goes through [`devmatch_core::Gateway`]. Components
//! report to the front-end through [`AppEvent`]s on a broadcast channel.

#![forbid(unsafe_code)]

pub mod app;
pub mod config;
pub mod connections;
pub mod events;
pub mod inbox;
pub mod lock;
pub mod profile;
pub mod queue;
pub mod session;
pub mod swipe;

pub use app::{AppContext, DevMatchApp};
pub use config::EngineConfig;
pub use connections::Connections;
pub use events::{AppEvent, Notice, NoticeLevel, Notifier};
pub use inbox::{RequestInbox, ReviewOutcome};
pub use lock::{ActionGuard, ActionLocks};
pub use profile::{DeleteOutcome, DraftField, ProfileEditor, SaveOutcome, SkillOutcome};
pub use queue::DiscoveryQueue;
pub use session::{AuthMode, Session, SessionStore, View};
pub use swipe::{Key, SwipeEngine, SwipeOutcome, SwipeState};

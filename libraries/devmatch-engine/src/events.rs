//! Engine Events
//!
//! Event-based communication for front-end synchronization.
//! Events are emitted at key points:
//! - Notices (the user-visible notifications)
//! - Navigation and session changes
//! - Discovery queue and candidate changes
//! - Inbox and connections list changes

use crate::session::View;
use devmatch_core::UserId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Default number of events buffered per subscriber
const DEFAULT_CAPACITY: usize = 64;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Success,
    Error,
    Warning,
    Info,
}

/// A user-visible notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }
}

/// Events emitted by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppEvent {
    /// A notification for the user
    Notice(Notice),

    /// The active view changed
    Navigated {
        /// The new view
        view: View,
    },

    /// The session was established or cleared
    SessionChanged {
        /// Logged-in user, `None` when unauthenticated
        user_id: Option<UserId>,
    },

    /// The presented discovery candidate changed
    CandidateChanged {
        /// Candidate now presented, `None` when idle or empty
        candidate_id: Option<UserId>,
    },

    /// Discovery queue contents changed
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Pending request inbox changed
    RequestsChanged {
        /// Number of pending requests
        pending: usize,
    },

    /// Connections list reloaded
    ConnectionsChanged {
        /// Number of connections
        count: usize,
    },

    /// Profile edit committed
    ProfileUpdated,

    /// Account deleted on the server
    AccountDeleted,
}

/// Broadcast sender for engine events.
///
/// Cloning shares the channel. Emitting with no subscribers is not an error.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<AppEvent>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to all events emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: AppEvent) {
        // No receivers is fine: the front-end may not be listening yet
        let _ = self.tx.send(event);
    }

    pub fn notify(&self, notice: Notice) {
        self.emit(AppEvent::Notice(notice));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Notice::success(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(Notice::error(message));
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.notify(Notice::warning(message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(Notice::info(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_receives_notice() {
        let notifier = Notifier::default();
        let mut rx = notifier.subscribe();

        notifier.warning("Skill already exists");

        assert_eq!(
            rx.try_recv().unwrap(),
            AppEvent::Notice(Notice::warning("Skill already exists"))
        );
    }

    #[test]
    fn test_emit_without_subscribers() {
        let notifier = Notifier::new(0);
        notifier.emit(AppEvent::ProfileUpdated);
    }

    #[test]
    fn test_clones_share_channel() {
        let notifier = Notifier::default();
        let mut rx = notifier.subscribe();

        notifier.clone().emit(AppEvent::Navigated { view: View::Feed });

        assert_eq!(rx.try_recv().unwrap(), AppEvent::Navigated { view: View::Feed });
    }
}

//! Accepted connections with local search

use crate::app::AppContext;
use crate::events::AppEvent;
use devmatch_core::{Result, User, UserId};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Default)]
struct ConnectionsInner {
    users: Vec<User>,
    fetching: bool,
    owner: Option<UserId>,
    epoch: u64,
}

/// Read-only list of the logged-in user's connections.
#[derive(Clone)]
pub struct Connections {
    ctx: Arc<AppContext>,
    inner: Arc<Mutex<ConnectionsInner>>,
}

impl Connections {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            inner: Arc::new(Mutex::new(ConnectionsInner::default())),
        }
    }

    pub fn all(&self) -> Vec<User> {
        self.inner.lock().users.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Connections whose full name or email contains `term`, ignoring case.
    ///
    /// A blank term matches everyone.
    pub fn search(&self, term: &str) -> Vec<User> {
        let term = term.trim().to_lowercase();
        self.inner
            .lock()
            .users
            .iter()
            .filter(|user| matches_term(user, &term))
            .cloned()
            .collect()
    }

    /// Reload the list. Returns `false` if a fetch was already running.
    pub async fn refresh(&self) -> Result<bool> {
        let user = self.ctx.require_user()?;

        let epoch = {
            let mut inner = self.inner.lock();
            if inner.owner.as_ref() != Some(&user.id) {
                inner.users.clear();
                inner.fetching = false;
                inner.owner = Some(user.id);
                inner.epoch += 1;
            }
            if inner.fetching {
                return Ok(false);
            }
            inner.fetching = true;
            inner.epoch
        };

        let result = self.ctx.gateway().connections().await;

        let loaded = {
            let mut inner = self.inner.lock();
            if inner.epoch != epoch {
                debug!("Discarding connections fetched before reset");
                return Ok(false);
            }
            inner.fetching = false;

            result.map(|users| {
                inner.users = users;
                inner.users.len()
            })
        };

        match loaded {
            Ok(count) => {
                debug!(count, "Connections loaded");
                self.ctx
                    .notifier()
                    .emit(AppEvent::ConnectionsChanged { count });
                Ok(true)
            }
            Err(e) => {
                self.ctx.report(&e);
                Err(e)
            }
        }
    }

    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.users.clear();
        inner.fetching = false;
        inner.owner = None;
        inner.epoch += 1;
    }
}

/// `term` must already be trimmed and lowercased
fn matches_term(user: &User, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }

    let name = format!("{} {}", user.first_name, user.last_name).to_lowercase();
    name.contains(term)
        || user
            .email_id
            .as_deref()
            .is_some_and(|email| email.to_lowercase().contains(term))
}

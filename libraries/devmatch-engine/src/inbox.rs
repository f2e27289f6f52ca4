//! Request inbox
//!
//! Pending incoming connection requests, each reviewable on its own.
//! Reviews are pessimistic: an entry leaves the inbox only after the
//! server has acknowledged the decision.

use crate::app::AppContext;
use crate::events::AppEvent;
use crate::lock::ActionLocks;
use devmatch_core::{PendingRequest, RequestId, Result, ReviewDecision, UserId};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a review request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// The server acknowledged the decision and the entry was removed
    Reviewed,
    /// A review of this request is already in flight
    AlreadyPending,
    /// No such request in the inbox
    NotFound,
    /// The inbox was reset while the review was in flight
    Discarded,
}

#[derive(Debug, Default)]
struct InboxInner {
    /// Insertion-ordered by arrival from the server
    requests: Vec<PendingRequest>,
    /// Requests committed this session; later refreshes never bring them back
    resolved: HashSet<RequestId>,
    fetching: bool,
    owner: Option<UserId>,
    epoch: u64,
}

impl InboxInner {
    fn reset(&mut self) {
        self.requests.clear();
        self.resolved.clear();
        self.fetching = false;
        self.owner = None;
        self.epoch += 1;
    }

    fn position(&self, id: &RequestId) -> Option<usize> {
        self.requests.iter().position(|request| &request.id == id)
    }
}

/// Pending connection requests addressed to the logged-in user.
#[derive(Clone)]
pub struct RequestInbox {
    ctx: Arc<AppContext>,
    inner: Arc<Mutex<InboxInner>>,
    locks: ActionLocks<RequestId, ReviewDecision>,
}

impl RequestInbox {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            inner: Arc::new(Mutex::new(InboxInner::default())),
            locks: ActionLocks::new(),
        }
    }

    pub fn requests(&self) -> Vec<PendingRequest> {
        self.inner.lock().requests.clone()
    }

    pub fn get(&self, id: &RequestId) -> Option<PendingRequest> {
        let inner = self.inner.lock();
        inner.position(id).map(|index| inner.requests[index].clone())
    }

    pub fn contains(&self, id: &RequestId) -> bool {
        self.inner.lock().position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decision in flight for a request, if any
    pub fn pending_decision(&self, id: &RequestId) -> Option<ReviewDecision> {
        self.locks.get(id)
    }

    /// Fetch pending requests and replace the inbox.
    ///
    /// Entries with a review in flight keep their local copy, and entries
    /// already reviewed are not brought back. Returns `false` if a fetch was
    /// already running.
    pub async fn list(&self) -> Result<bool> {
        let user = self.ctx.require_user()?;

        let epoch = {
            let mut inner = self.inner.lock();
            if inner.owner.as_ref() != Some(&user.id) {
                inner.reset();
                inner.owner = Some(user.id);
            }
            if inner.fetching {
                debug!("Requests fetch already in flight");
                return Ok(false);
            }
            inner.fetching = true;
            inner.epoch
        };

        let result = self.ctx.gateway().received_requests().await;

        let merged = {
            let mut inner = self.inner.lock();
            if inner.epoch != epoch {
                debug!("Discarding requests fetched before reset");
                return Ok(false);
            }
            inner.fetching = false;

            result.map(|fetched| {
                let merged = self.merge(&inner, fetched);
                inner.requests = merged;
                inner.requests.len()
            })
        };

        match merged {
            Ok(pending) => {
                debug!(pending, "Requests loaded");
                self.ctx
                    .notifier()
                    .emit(AppEvent::RequestsChanged { pending });
                Ok(true)
            }
            Err(e) => {
                self.ctx.report(&e);
                Err(e)
            }
        }
    }

    /// Accept or decline a pending request.
    ///
    /// A second review of the same request while one is in flight is a no-op.
    /// On failure the entry stays and the server's message is reported as is.
    pub async fn review(&self, id: &RequestId, decision: ReviewDecision) -> Result<ReviewOutcome> {
        let (sender_name, epoch, _guard) = {
            let inner = self.inner.lock();
            let Some(index) = inner.position(id) else {
                debug!(request_id = %id, "Review ignored: unknown request");
                return Ok(ReviewOutcome::NotFound);
            };
            let Some(guard) = self.locks.try_acquire_with(id.clone(), decision) else {
                debug!(request_id = %id, "Review ignored: already in flight");
                return Ok(ReviewOutcome::AlreadyPending);
            };
            (
                inner.requests[index].sender.first_name.clone(),
                inner.epoch,
                guard,
            )
        };

        debug!(request_id = %id, decision = %decision, "Reviewing request");
        let result = self.ctx.gateway().review_request(decision, id).await;

        let committed = {
            let mut inner = self.inner.lock();
            if inner.epoch != epoch {
                debug!(request_id = %id, "Discarding review result after reset");
                return Ok(ReviewOutcome::Discarded);
            }

            result.map(|()| {
                if let Some(index) = inner.position(id) {
                    inner.requests.remove(index);
                }
                inner.resolved.insert(id.clone());
                inner.requests.len()
            })
        };

        match committed {
            Ok(pending) => {
                info!(request_id = %id, decision = %decision, "Request reviewed");
                self.ctx.notifier().success(match decision {
                    ReviewDecision::Accepted => format!("You're now connected with {}!", sender_name),
                    ReviewDecision::Rejected => "Request declined politely".to_string(),
                });
                self.ctx
                    .notifier()
                    .emit(AppEvent::RequestsChanged { pending });
                Ok(ReviewOutcome::Reviewed)
            }
            Err(e) => {
                self.ctx.report(&e);
                Err(e)
            }
        }
    }

    /// Forget everything; results of calls still in flight are dropped
    pub fn reset(&self) {
        self.inner.lock().reset();
        self.locks.clear();
        debug!("Request inbox reset");
    }

    fn merge(&self, inner: &InboxInner, fetched: Vec<PendingRequest>) -> Vec<PendingRequest> {
        let local = |id: &RequestId| inner.position(id).map(|index| inner.requests[index].clone());

        let mut merged: Vec<PendingRequest> = fetched
            .into_iter()
            .filter(|request| !inner.resolved.contains(&request.id))
            .map(|request| {
                if self.locks.is_held(&request.id) {
                    local(&request.id).unwrap_or(request)
                } else {
                    request
                }
            })
            .collect();

        // In-flight entries the server no longer lists stay until their review settles
        for request in &inner.requests {
            if self.locks.is_held(&request.id) && !merged.iter().any(|r| r.id == request.id) {
                merged.push(request.clone());
            }
        }

        merged
    }
}

//! Swipe engine
//!
//! Drives one discovery candidate at a time through
//! present -> animate -> commit, with rollback on failure.
//!
//! Swipes are optimistic: the candidate leaves the screen as soon as the
//! animation starts, and is put back if the server refuses the decision.
//! The candidate is only removed from the queue once the server has
//! acknowledged it.

use crate::app::AppContext;
use crate::events::AppEvent;
use crate::lock::ActionLocks;
use crate::queue::DiscoveryQueue;
use devmatch_core::{Result, SendStatus, SwipeDirection, User, UserId};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Swipe state machine
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SwipeState {
    /// Nothing loaded yet
    #[default]
    Idle,
    /// A candidate is on screen and accepts swipes
    Presenting(User),
    /// The swipe transition is playing
    Animating(User, SwipeDirection),
    /// The decision has been sent and awaits acknowledgment
    Committing(User, SwipeDirection),
    /// The feed ran dry
    Empty,
}

impl SwipeState {
    /// Candidate the state refers to, if any
    pub fn candidate(&self) -> Option<&User> {
        match self {
            SwipeState::Presenting(user)
            | SwipeState::Animating(user, _)
            | SwipeState::Committing(user, _) => Some(user),
            SwipeState::Idle | SwipeState::Empty => None,
        }
    }

    /// Whether a swipe is in flight
    pub fn is_busy(&self) -> bool {
        matches!(self, SwipeState::Animating(..) | SwipeState::Committing(..))
    }
}

/// Keys the discovery screen reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Space,
}

/// Result of a swipe request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// The decision was acknowledged and the candidate removed
    Sent,
    /// Not presenting, or a swipe on this candidate is already in flight
    Ignored,
    /// The engine was reset while the swipe was in flight
    Discarded,
}

/// What to do about the queue after a successful commit
enum Refill {
    None,
    Inline,
    Background,
}

#[derive(Debug, Default)]
struct SwipeInner {
    state: SwipeState,
    queue: DiscoveryQueue,
    show_details: bool,
    fetching: bool,
    /// Candidates already decided on; later feed pages never bring them back
    reviewed: HashSet<UserId>,
    /// User the queue was loaded for
    owner: Option<UserId>,
    /// Bumped on reset; results of older calls are dropped
    epoch: u64,
}

impl SwipeInner {
    fn reset(&mut self) {
        self.state = SwipeState::Idle;
        self.queue.clear();
        self.show_details = false;
        self.fetching = false;
        self.reviewed.clear();
        self.owner = None;
        self.epoch += 1;
    }

    /// Present the candidate at the cursor, or `Empty` if there is none.
    fn present(&mut self) {
        self.state = match self.queue.current() {
            Some(user) => SwipeState::Presenting(user.clone()),
            None => SwipeState::Empty,
        };
    }
}

/// Discovery feed with swipe decisions.
///
/// Cheap to clone; clones share state, so a background refetch can run on
/// its own task.
#[derive(Clone)]
pub struct SwipeEngine {
    ctx: Arc<AppContext>,
    inner: Arc<Mutex<SwipeInner>>,
    locks: ActionLocks<UserId>,
}

impl SwipeEngine {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            inner: Arc::new(Mutex::new(SwipeInner::default())),
            locks: ActionLocks::new(),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn state(&self) -> SwipeState {
        self.inner.lock().state.clone()
    }

    /// Candidate on screen (also while animating or committing)
    pub fn current(&self) -> Option<User> {
        self.inner.lock().state.candidate().cloned()
    }

    /// Candidate that will be presented after the current one
    pub fn peek_next(&self) -> Option<User> {
        self.inner.lock().queue.peek_next().cloned()
    }

    pub fn queue(&self) -> Vec<User> {
        self.inner.lock().queue.get_all().to_vec()
    }

    pub fn queue_len(&self) -> usize {
        self.inner.lock().queue.len()
    }

    pub fn show_details(&self) -> bool {
        self.inner.lock().show_details
    }

    pub fn is_fetching(&self) -> bool {
        self.inner.lock().fetching
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Load the feed if nothing is queued and present the first candidate.
    ///
    /// Requires a session. A queue that already holds candidates is presented
    /// without fetching.
    pub async fn mount(&self) -> Result<()> {
        let user = self.ctx.require_user()?;

        let needs_fetch = {
            let mut inner = self.inner.lock();
            if inner.owner.as_ref() != Some(&user.id) {
                if inner.owner.is_some() {
                    debug!("Session user changed, dropping discovery queue");
                }
                inner.reset();
                inner.owner = Some(user.id);
            }

            if inner.queue.is_empty() {
                true
            } else {
                if matches!(inner.state, SwipeState::Idle | SwipeState::Empty) {
                    inner.present();
                }
                false
            }
        };

        if needs_fetch {
            self.fetch().await?;
        } else {
            self.emit_candidate();
        }
        Ok(())
    }

    /// Refetch the feed on demand
    pub async fn refresh(&self) -> Result<()> {
        self.ctx.require_user()?;
        self.fetch().await?;
        Ok(())
    }

    /// Swipe the presented candidate.
    ///
    /// The decision is sent after the configured animation delay. On failure
    /// the same candidate is presented again, the queue is untouched, and the
    /// error is returned after being reported.
    pub async fn swipe(&self, direction: SwipeDirection) -> Result<SwipeOutcome> {
        let (candidate, epoch, _guard) = {
            let mut inner = self.inner.lock();
            let SwipeState::Presenting(candidate) = &inner.state else {
                debug!(state = ?inner.state, "Swipe ignored: nothing presented");
                return Ok(SwipeOutcome::Ignored);
            };
            let candidate = candidate.clone();

            let Some(guard) = self.locks.try_acquire(candidate.id.clone()) else {
                debug!(candidate_id = %candidate.id, "Swipe ignored: already in flight");
                return Ok(SwipeOutcome::Ignored);
            };

            inner.state = SwipeState::Animating(candidate.clone(), direction);
            (candidate, inner.epoch, guard)
        };

        debug!(candidate_id = %candidate.id, direction = ?direction, "Swipe animating");
        tokio::time::sleep(self.ctx.config().swipe_animation()).await;

        {
            let mut inner = self.inner.lock();
            if inner.epoch != epoch {
                return Ok(SwipeOutcome::Discarded);
            }
            inner.state = SwipeState::Committing(candidate.clone(), direction);
        }

        let status = direction.status();
        let result = self
            .ctx
            .gateway()
            .send_request(status, &candidate.id)
            .await;

        let committed = {
            let mut inner = self.inner.lock();
            if inner.epoch != epoch {
                debug!(candidate_id = %candidate.id, "Discarding swipe result after reset");
                return Ok(SwipeOutcome::Discarded);
            }

            match result {
                Ok(()) => {
                    inner.queue.remove(&candidate.id);
                    inner.reviewed.insert(candidate.id.clone());
                    inner.show_details = false;
                    inner.present();
                    Ok(inner.queue.len())
                }
                Err(e) => {
                    // A feed page that landed mid-swipe may have dropped the candidate
                    inner.queue.restore(candidate.clone());
                    inner.present();
                    Err(e)
                }
            }
        };

        let remaining = match committed {
            Ok(remaining) => remaining,
            Err(e) => {
                self.ctx.report(&e);
                return Err(e);
            }
        };

        info!(candidate_id = %candidate.id, status = %status, remaining, "Swipe committed");
        self.ctx.notifier().success(match status {
            SendStatus::Interested => "Connection request sent!",
            SendStatus::Ignored => "Profile passed",
        });
        self.ctx
            .notifier()
            .emit(AppEvent::QueueChanged { length: remaining });
        self.emit_candidate();

        let refill = if remaining == 0 {
            Refill::Inline
        } else if remaining <= self.ctx.config().refill_threshold {
            Refill::Background
        } else {
            Refill::None
        };

        match refill {
            Refill::Inline => {
                // Failures are already reported by fetch
                let _ = self.fetch().await;
            }
            Refill::Background => {
                let engine = self.clone();
                tokio::spawn(async move {
                    let _ = engine.fetch().await;
                });
            }
            Refill::None => {}
        }

        Ok(SwipeOutcome::Sent)
    }

    /// Keyboard control: arrows swipe, space toggles the details panel.
    ///
    /// Returns `None` for keys that don't swipe.
    pub async fn handle_key(&self, key: Key) -> Result<Option<SwipeOutcome>> {
        match key {
            Key::ArrowLeft => self.swipe(SwipeDirection::Left).await.map(Some),
            Key::ArrowRight => self.swipe(SwipeDirection::Right).await.map(Some),
            Key::Space => {
                self.toggle_details();
                Ok(None)
            }
        }
    }

    /// Flip the details panel; independent of the swipe state
    pub fn toggle_details(&self) -> bool {
        let mut inner = self.inner.lock();
        inner.show_details = !inner.show_details;
        inner.show_details
    }

    /// Forget everything; results of calls still in flight are dropped
    pub fn reset(&self) {
        self.inner.lock().reset();
        self.locks.clear();
        debug!("Swipe engine reset");
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Fetch a feed page into the queue.
    ///
    /// Returns `false` without a network call if a fetch is already running.
    async fn fetch(&self) -> Result<bool> {
        let epoch = {
            let mut inner = self.inner.lock();
            if inner.fetching {
                debug!("Feed fetch already in flight");
                return Ok(false);
            }
            inner.fetching = true;
            inner.epoch
        };

        let result = self.ctx.gateway().feed().await;

        let mut inner = self.inner.lock();
        if inner.epoch != epoch {
            debug!("Discarding feed fetched before reset");
            return Ok(false);
        }
        inner.fetching = false;

        match result {
            Ok(page) => {
                let fetched = page.len();
                let fresh: Vec<User> = page
                    .into_iter()
                    .filter(|user| !inner.reviewed.contains(&user.id))
                    .collect();
                inner.queue.replace(fresh);

                if !inner.state.is_busy() {
                    inner.present();
                }
                let length = inner.queue.len();
                drop(inner);

                debug!(fetched, queued = length, "Feed loaded");
                self.ctx.notifier().emit(AppEvent::QueueChanged { length });
                self.emit_candidate();
                Ok(true)
            }
            Err(e) => {
                drop(inner);
                self.ctx.report(&e);
                Err(e)
            }
        }
    }

    fn emit_candidate(&self) {
        let candidate_id = self.current().map(|user| user.id);
        self.ctx
            .notifier()
            .emit(AppEvent::CandidateChanged { candidate_id });
    }
}

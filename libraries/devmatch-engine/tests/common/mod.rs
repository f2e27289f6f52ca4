//! Shared test helpers: a scripted in-memory gateway and fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use devmatch_core::{
    DevMatchError, Gateway, LoginCredentials, PendingRequest, ProfileDraft, RequestId, Result,
    ReviewDecision, SendStatus, SignupForm, User, UserId,
};
use devmatch_engine::{AppEvent, DevMatchApp, EngineConfig, Notice};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Semaphore};

/// A gateway call as recorded by [`FakeGateway`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ProfileView,
    Login(String),
    Signup(String),
    Logout,
    Feed,
    SendRequest(SendStatus, UserId),
    Connections,
    ReceivedRequests,
    Review(ReviewDecision, RequestId),
    UpdateProfile(ProfileDraft),
    DeleteProfile,
}

#[derive(Default)]
struct Script {
    profile: Option<User>,
    feed: VecDeque<Result<Vec<User>>>,
    send: VecDeque<Result<()>>,
    requests: VecDeque<Result<Vec<PendingRequest>>>,
    review: VecDeque<Result<()>>,
    connections: Vec<User>,
    update: VecDeque<Result<()>>,
    delete: VecDeque<Result<()>>,
    logout: Option<DevMatchError>,
}

/// Scripted gateway.
///
/// Queued responses are used in order; once a queue runs dry the call
/// succeeds with an empty result. While held, every call blocks (after
/// being recorded) until [`release`](Self::release) hands out a permit.
pub struct FakeGateway {
    script: Mutex<Script>,
    calls: Mutex<Vec<Call>>,
    held: AtomicBool,
    gate: Semaphore,
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(Script::default()),
            calls: Mutex::new(Vec::new()),
            held: AtomicBool::new(false),
            gate: Semaphore::new(0),
        })
    }

    /// Server session for `user`: profile lookup and login succeed as them
    pub fn sign_in_as(&self, user: User) {
        self.script.lock().profile = Some(user);
    }

    pub fn push_feed(&self, page: Vec<User>) {
        self.script.lock().feed.push_back(Ok(page));
    }

    pub fn fail_feed(&self, err: DevMatchError) {
        self.script.lock().feed.push_back(Err(err));
    }

    pub fn push_send(&self, result: Result<()>) {
        self.script.lock().send.push_back(result);
    }

    pub fn push_requests(&self, requests: Vec<PendingRequest>) {
        self.script.lock().requests.push_back(Ok(requests));
    }

    pub fn fail_requests(&self, err: DevMatchError) {
        self.script.lock().requests.push_back(Err(err));
    }

    pub fn push_review(&self, result: Result<()>) {
        self.script.lock().review.push_back(result);
    }

    pub fn set_connections(&self, users: Vec<User>) {
        self.script.lock().connections = users;
    }

    pub fn push_update(&self, result: Result<()>) {
        self.script.lock().update.push_back(result);
    }

    pub fn push_delete(&self, result: Result<()>) {
        self.script.lock().delete.push_back(result);
    }

    pub fn fail_logout(&self, err: DevMatchError) {
        self.script.lock().logout = Some(err);
    }

    /// Block every subsequent call until released
    pub fn hold(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    /// Let `n` blocked calls through
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| pred(call)).count()
    }

    pub fn feed_calls(&self) -> usize {
        self.count(|call| matches!(call, Call::Feed))
    }

    pub fn send_calls(&self) -> usize {
        self.count(|call| matches!(call, Call::SendRequest(..)))
    }

    pub fn review_calls(&self) -> usize {
        self.count(|call| matches!(call, Call::Review(..)))
    }

    async fn enter(&self, call: Call) {
        self.calls.lock().push(call);
        if self.held.load(Ordering::SeqCst) {
            if let Ok(permit) = self.gate.acquire().await {
                permit.forget();
            }
        }
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn profile_view(&self) -> Result<User> {
        self.enter(Call::ProfileView).await;
        self.script
            .lock()
            .profile
            .clone()
            .ok_or(DevMatchError::AuthRequired)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<User> {
        self.enter(Call::Login(credentials.email_id.clone())).await;
        self.script
            .lock()
            .profile
            .clone()
            .ok_or_else(|| DevMatchError::conflict("Invalid credentials"))
    }

    async fn signup(&self, form: &SignupForm) -> Result<User> {
        self.enter(Call::Signup(form.email_id.clone())).await;
        Ok(User::new(UserId::new("new-user"), &form.first_name, &form.last_name))
    }

    async fn logout(&self) -> Result<()> {
        self.enter(Call::Logout).await;
        match self.script.lock().logout.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn feed(&self) -> Result<Vec<User>> {
        self.enter(Call::Feed).await;
        self.script.lock().feed.pop_front().unwrap_or(Ok(Vec::new()))
    }

    async fn send_request(&self, status: SendStatus, target: &UserId) -> Result<()> {
        self.enter(Call::SendRequest(status, target.clone())).await;
        self.script.lock().send.pop_front().unwrap_or(Ok(()))
    }

    async fn connections(&self) -> Result<Vec<User>> {
        self.enter(Call::Connections).await;
        Ok(self.script.lock().connections.clone())
    }

    async fn received_requests(&self) -> Result<Vec<PendingRequest>> {
        self.enter(Call::ReceivedRequests).await;
        self.script
            .lock()
            .requests
            .pop_front()
            .unwrap_or(Ok(Vec::new()))
    }

    async fn review_request(&self, decision: ReviewDecision, request: &RequestId) -> Result<()> {
        self.enter(Call::Review(decision, request.clone())).await;
        self.script.lock().review.pop_front().unwrap_or(Ok(()))
    }

    async fn update_profile(&self, draft: &ProfileDraft) -> Result<()> {
        self.enter(Call::UpdateProfile(draft.clone())).await;
        self.script.lock().update.pop_front().unwrap_or(Ok(()))
    }

    async fn delete_profile(&self) -> Result<()> {
        self.enter(Call::DeleteProfile).await;
        self.script.lock().delete.pop_front().unwrap_or(Ok(()))
    }
}

// ===== Fixtures =====

pub fn user(id: &str, first: &str) -> User {
    let mut user = User::new(UserId::new(id), first, "Tester");
    user.email_id = Some(format!("{}@example.com", first.to_lowercase()));
    user
}

pub fn me() -> User {
    user("me", "Ada")
}

pub fn request(id: &str, sender: User) -> PendingRequest {
    PendingRequest {
        id: RequestId::new(id),
        sender,
        received_at: None,
    }
}

/// App over `gateway` with a resolved session for [`me`]
pub async fn logged_in_app(gateway: &Arc<FakeGateway>) -> DevMatchApp {
    logged_in_app_with(gateway, EngineConfig::default()).await
}

pub async fn logged_in_app_with(gateway: &Arc<FakeGateway>, config: EngineConfig) -> DevMatchApp {
    gateway.sign_in_as(me());
    let app = DevMatchApp::new(gateway.clone(), config);
    app.bootstrap().await.unwrap();
    app
}

/// Every notice emitted since the last drain
pub fn drain_notices(rx: &mut broadcast::Receiver<AppEvent>) -> Vec<Notice> {
    let mut notices = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(AppEvent::Notice(notice)) => notices.push(notice),
            Ok(_) | Err(broadcast::error::TryRecvError::Lagged(_)) => {}
            Err(_) => return notices,
        }
    }
}

/// Wait until `done` holds, letting spawned tasks and paused timers run
pub async fn settle(done: impl Fn() -> bool) {
    for _ in 0..1000 {
        if done() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition never became true");
}

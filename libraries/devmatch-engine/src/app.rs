//! Application aggregate
//!
//! [`AppContext`] bundles what every component needs (gateway, session,
//! notifier, config); [`DevMatchApp`] owns one context and one instance of
//! each component.

use crate::config::EngineConfig;
use crate::connections::Connections;
use crate::events::{AppEvent, Notifier};
use crate::inbox::RequestInbox;
use crate::profile::{DeleteOutcome, ProfileEditor};
use crate::session::SessionStore;
use crate::swipe::SwipeEngine;
use devmatch_core::{DevMatchError, Gateway, LoginCredentials, Result, SignupForm, User};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;

/// Shared dependencies of the engine components
pub struct AppContext {
    gateway: Arc<dyn Gateway>,
    session: SessionStore,
    notifier: Notifier,
    config: EngineConfig,
}

impl AppContext {
    pub fn new(gateway: Arc<dyn Gateway>, config: EngineConfig) -> Arc<Self> {
        let notifier = Notifier::default();
        let session = SessionStore::new(Arc::clone(&gateway), notifier.clone());
        Arc::new(Self {
            gateway,
            session,
            notifier,
            config,
        })
    }

    pub fn gateway(&self) -> &dyn Gateway {
        self.gateway.as_ref()
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Report a failure: one notice, and session invalidation on a 401
    pub fn report(&self, err: &DevMatchError) {
        self.session.report(err);
    }

    /// The logged-in user, or `AuthRequired` (reported) if there is none
    pub fn require_user(&self) -> Result<User> {
        match self.session.user() {
            Some(user) => Ok(user),
            None => {
                let err = DevMatchError::AuthRequired;
                self.report(&err);
                Err(err)
            }
        }
    }
}

/// The client application: session plus every stateful component.
///
/// # Example
///
/// ```ignore
/// use devmatch_engine::{DevMatchApp, EngineConfig};
/// use devmatch_core::SwipeDirection;
///
/// let app = DevMatchApp::new(gateway, EngineConfig::default());
/// let mut events = app.subscribe();
///
/// app.bootstrap().await?;
/// app.swipe().mount().await?;
/// app.swipe().swipe(SwipeDirection::Right).await?;
/// ```
pub struct DevMatchApp {
    ctx: Arc<AppContext>,
    swipe: SwipeEngine,
    inbox: RequestInbox,
    connections: Connections,
    profile: ProfileEditor,
}

impl DevMatchApp {
    pub fn new(gateway: Arc<dyn Gateway>, config: EngineConfig) -> Self {
        let ctx = AppContext::new(gateway, config);
        Self {
            swipe: SwipeEngine::new(Arc::clone(&ctx)),
            inbox: RequestInbox::new(Arc::clone(&ctx)),
            connections: Connections::new(Arc::clone(&ctx)),
            profile: ProfileEditor::new(Arc::clone(&ctx)),
            ctx,
        }
    }

    pub fn context(&self) -> &Arc<AppContext> {
        &self.ctx
    }

    pub fn session(&self) -> &SessionStore {
        self.ctx.session()
    }

    pub fn swipe(&self) -> &SwipeEngine {
        &self.swipe
    }

    pub fn inbox(&self) -> &RequestInbox {
        &self.inbox
    }

    pub fn connections(&self) -> &Connections {
        &self.connections
    }

    pub fn profile(&self) -> &ProfileEditor {
        &self.profile
    }

    /// Subscribe to engine events
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.ctx.notifier().subscribe()
    }

    /// Resolve the session at startup
    pub async fn bootstrap(&self) -> Result<Option<User>> {
        self.ctx.session().bootstrap().await
    }

    pub async fn login(&self, credentials: LoginCredentials) -> Result<User> {
        self.ctx.session().login(credentials).await
    }

    pub async fn signup(&self, form: SignupForm) -> Result<User> {
        self.ctx.session().signup(form).await
    }

    /// Log out and reset every component.
    ///
    /// Local state is cleared before the server is told, so a failed server
    /// logout still leaves the client logged out.
    pub async fn logout(&self) -> Result<()> {
        self.reset_components();
        self.ctx.session().logout().await
    }

    /// Confirm a pending account deletion; resets every component on success
    pub async fn confirm_delete_account(&self) -> Result<DeleteOutcome> {
        let outcome = self.profile.confirm_delete().await?;
        if outcome == DeleteOutcome::Deleted {
            self.reset_components();
        }
        Ok(outcome)
    }

    fn reset_components(&self) {
        self.swipe.reset();
        self.inbox.reset();
        self.connections.reset();
        self.profile.reset();
        info!("Components reset");
    }
}

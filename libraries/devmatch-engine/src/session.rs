//! Session store
//!
//! Holds the authenticated user (or nothing), the active view and the
//! login/signup form state. Every component reads the session through this
//! store, and every failure is reported through [`SessionStore::report`] so
//! a 401 anywhere invalidates the session exactly once.

use crate::events::{AppEvent, Notifier};
use devmatch_core::validation::{validate_login, validate_signup};
use devmatch_core::{
    DevMatchError, Field, FieldErrors, Gateway, LoginCredentials, Result, SignupForm, User,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fallback shown when a login is refused without a message
const LOGIN_REJECTED: &str = "Invalid email or password";

/// Screen the front-end should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum View {
    #[default]
    Login,
    Feed,
    Profile,
    Connections,
    Requests,
}

impl View {
    pub fn as_str(self) -> &'static str {
        match self {
            View::Login => "login",
            View::Feed => "feed",
            View::Profile => "profile",
            View::Connections => "connections",
            View::Requests => "requests",
        }
    }
}

/// Which form the login screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

/// Authentication state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
    #[default]
    Unauthenticated,
    Authenticated(User),
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated(user) => Some(user),
            Session::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }
}

#[derive(Debug, Default)]
struct SessionState {
    session: Session,
    view: View,
    auth_mode: AuthMode,
    form_errors: FieldErrors,
    /// Bumped on every session transition
    epoch: u64,
}

/// Owner of the session, the active view and the auth form state.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<Mutex<SessionState>>,
    gateway: Arc<dyn Gateway>,
    notifier: Notifier,
}

impl SessionStore {
    pub fn new(gateway: Arc<dyn Gateway>, notifier: Notifier) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            gateway,
            notifier,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn session(&self) -> Session {
        self.state.lock().session.clone()
    }

    /// The logged-in user, if any
    pub fn user(&self) -> Option<User> {
        self.state.lock().session.user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.lock().session.is_authenticated()
    }

    pub fn view(&self) -> View {
        self.state.lock().view
    }

    pub fn auth_mode(&self) -> AuthMode {
        self.state.lock().auth_mode
    }

    /// Errors of the last login or signup attempt
    pub fn form_errors(&self) -> FieldErrors {
        self.state.lock().form_errors.clone()
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.state.lock().epoch
    }

    // =========================================================================
    // Local transitions
    // =========================================================================

    /// Switch the active view
    pub fn navigate(&self, view: View) {
        let changed = {
            let mut state = self.state.lock();
            let changed = state.view != view;
            state.view = view;
            changed
        };

        if changed {
            debug!(view = view.as_str(), "Navigated");
            self.notifier.emit(AppEvent::Navigated { view });
        }
    }

    /// Navigate only if no session transition happened since `epoch`
    pub(crate) fn navigate_if_current(&self, epoch: u64, view: View) -> bool {
        if self.epoch() != epoch {
            debug!(view = view.as_str(), "Skipping stale redirect");
            return false;
        }
        self.navigate(view);
        true
    }

    /// Switch between the login and signup forms
    pub fn set_auth_mode(&self, mode: AuthMode) {
        let mut state = self.state.lock();
        state.auth_mode = mode;
        state.form_errors.clear();
    }

    /// Drop the session after a 401 and route to login
    pub fn invalidate(&self) {
        let was_authenticated = self.clear();
        if was_authenticated {
            info!("Session invalidated");
        }
        self.navigate(View::Login);
    }

    /// Apply a mutation to the committed user.
    ///
    /// Returns `false` if nobody is logged in.
    pub fn update_user(&self, f: impl FnOnce(&mut User)) -> bool {
        let user_id = {
            let mut state = self.state.lock();
            match &mut state.session {
                Session::Authenticated(user) => {
                    f(user);
                    user.id.clone()
                }
                Session::Unauthenticated => return false,
            }
        };

        debug!(user_id = %user_id, "Updated session user");
        true
    }

    /// Set unauthenticated without navigating.
    ///
    /// Returns whether a session was cleared.
    pub(crate) fn clear(&self) -> bool {
        let was_authenticated = {
            let mut state = self.state.lock();
            let was_authenticated = state.session.is_authenticated();
            state.session = Session::Unauthenticated;
            state.epoch += 1;
            was_authenticated
        };

        if was_authenticated {
            self.notifier.emit(AppEvent::SessionChanged { user_id: None });
        }
        was_authenticated
    }

    fn authenticate(&self, user: User) {
        let user_id = user.id.clone();
        {
            let mut state = self.state.lock();
            state.session = Session::Authenticated(user);
            state.form_errors.clear();
            state.epoch += 1;
        }

        info!(user_id = %user_id, "Session established");
        self.notifier.emit(AppEvent::SessionChanged {
            user_id: Some(user_id),
        });
    }

    fn reject_form(&self, errors: FieldErrors) -> DevMatchError {
        if let Some(message) = errors.first_message() {
            self.notifier.error(message);
        }
        self.state.lock().form_errors = errors.clone();
        DevMatchError::Validation(errors)
    }

    /// Shared failure reporter.
    ///
    /// Emits exactly one notice; `AuthRequired` also invalidates the session.
    pub fn report(&self, err: &DevMatchError) {
        warn!(error = %err, "Operation failed");
        if err.is_auth_required() {
            self.invalidate();
        }
        self.notifier.error(err.user_message());
    }

    // =========================================================================
    // Network operations
    // =========================================================================

    /// Resolve the session at startup.
    ///
    /// Returns the cached user without a network call if there is one.
    /// `Ok(None)` means the server has no session for us.
    pub async fn bootstrap(&self) -> Result<Option<User>> {
        let epoch = {
            let state = self.state.lock();
            if let Some(user) = state.session.user() {
                return Ok(Some(user.clone()));
            }
            state.epoch
        };

        debug!("Probing session");
        match self.gateway.profile_view().await {
            Ok(user) => {
                if self.epoch() != epoch {
                    debug!("Session changed during probe, keeping current");
                    return Ok(self.user());
                }
                self.authenticate(user.clone());
                if self.view() == View::Login {
                    self.navigate(View::Feed);
                }
                Ok(Some(user))
            }
            Err(DevMatchError::AuthRequired) => {
                debug!("No server session");
                self.invalidate();
                Ok(None)
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Log in and route to the feed.
    ///
    /// A refused login comes back as `Validation` with the server's message
    /// under [`Field::Submit`]; the session is left untouched.
    pub async fn login(&self, credentials: LoginCredentials) -> Result<User> {
        let errors = validate_login(&credentials);
        if !errors.is_empty() {
            return Err(self.reject_form(errors));
        }

        match self.gateway.login(&credentials).await {
            Ok(user) => {
                self.authenticate(user.clone());
                self.navigate(View::Feed);
                self.notifier.success("Login successful");
                Ok(user)
            }
            Err(DevMatchError::Conflict(message)) => {
                Err(self.reject_form(FieldErrors::single(Field::Submit, message)))
            }
            Err(DevMatchError::AuthRequired) => {
                Err(self.reject_form(FieldErrors::single(Field::Submit, LOGIN_REJECTED)))
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Create an account.
    ///
    /// Never authenticates: on success the form switches to login mode.
    pub async fn signup(&self, form: SignupForm) -> Result<User> {
        let errors = validate_signup(&form);
        if !errors.is_empty() {
            return Err(self.reject_form(errors));
        }

        match self.gateway.signup(&form).await {
            Ok(user) => {
                info!(user_id = %user.id, "Account created");
                self.set_auth_mode(AuthMode::Login);
                self.navigate(View::Login);
                self.notifier
                    .success("Signup successful, please login to continue");
                Ok(user)
            }
            Err(DevMatchError::Conflict(message)) => {
                Err(self.reject_form(FieldErrors::single(Field::Submit, message)))
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Clear the session locally, then end it on the server.
    ///
    /// A server failure is notified but never restores the session.
    pub async fn logout(&self) -> Result<()> {
        self.clear();
        self.navigate(View::Login);

        match self.gateway.logout().await {
            Ok(()) => {
                info!("Logged out");
                self.notifier.success("Logout successful");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Server logout failed");
                self.notifier
                    .error(format!("Error during logout: {}", e.user_message()));
                Err(e)
            }
        }
    }
}

//! Profile editor
//!
//! Draft/commit editing of the logged-in user's profile, plus two-step
//! account deletion. Saves are pessimistic: the committed user changes only
//! after the server acknowledges the edit.

use crate::app::AppContext;
use crate::events::AppEvent;
use crate::lock::ActionLocks;
use crate::session::View;
use devmatch_core::validation::validate_profile;
use devmatch_core::{
    DevMatchError, Field, FieldErrors, Gender, ProfileDraft, Result, SkillRejection, UserId,
};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use tracing::{debug, info};

/// Key of the single lock shared by save and delete
const PROFILE_LOCK: &str = "profile";

/// One edit to the draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    FirstName(String),
    LastName(String),
    Age(Option<u32>),
    Gender(Gender),
    PhotoUrl(String),
    About(String),
}

impl DraftField {
    /// Form field whose error this edit clears
    pub fn field(&self) -> Field {
        match self {
            DraftField::FirstName(_) => Field::FirstName,
            DraftField::LastName(_) => Field::LastName,
            DraftField::Age(_) => Field::Age,
            DraftField::Gender(_) => Field::Gender,
            DraftField::PhotoUrl(_) => Field::PhotoUrl,
            DraftField::About(_) => Field::About,
        }
    }

    fn apply(self, draft: &mut ProfileDraft) {
        match self {
            DraftField::FirstName(value) => draft.first_name = value,
            DraftField::LastName(value) => draft.last_name = value,
            DraftField::Age(value) => draft.age = value,
            DraftField::Gender(value) => draft.gender = value,
            DraftField::PhotoUrl(value) => draft.photo_url = value,
            DraftField::About(value) => draft.about = value,
        }
    }
}

/// Result of a skill edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillOutcome {
    Added,
    Removed,
    /// The skill was not added; the draft is unchanged
    Rejected(SkillRejection),
    /// No such skill in the draft
    NotFound,
}

/// Result of a save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// A save or delete is already in flight
    AlreadyPending,
    /// The editor was reset while the save was in flight
    Discarded,
}

/// Result of a delete confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// `request_delete` was not called first; nothing was sent
    NotRequested,
    /// A save or delete is already in flight
    AlreadyPending,
}

#[derive(Debug, Default)]
struct EditorInner {
    draft: Option<ProfileDraft>,
    errors: FieldErrors,
    confirming_delete: bool,
    /// User the draft was taken from
    owner: Option<UserId>,
    epoch: u64,
}

impl EditorInner {
    /// Bind the editor to `user_id`, dropping anything left by another user
    fn adopt(&mut self, user_id: &UserId) {
        if self.owner.as_ref() == Some(user_id) {
            return;
        }
        if self.owner.is_some() {
            debug!("Session user changed, dropping profile draft");
        }
        self.draft = None;
        self.errors.clear();
        self.confirming_delete = false;
        self.owner = Some(user_id.clone());
    }

    /// Whether the state belongs to the given session user
    fn owned_by(&self, user_id: Option<&UserId>) -> bool {
        user_id.is_some() && self.owner.as_ref() == user_id
    }
}

/// Editor for the logged-in user's profile.
#[derive(Clone)]
pub struct ProfileEditor {
    ctx: Arc<AppContext>,
    inner: Arc<Mutex<EditorInner>>,
    locks: ActionLocks<&'static str>,
}

impl ProfileEditor {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            inner: Arc::new(Mutex::new(EditorInner::default())),
            locks: ActionLocks::new(),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_editing(&self) -> bool {
        self.draft().is_some()
    }

    /// The draft, if one is open for the current session user
    pub fn draft(&self) -> Option<ProfileDraft> {
        let user_id = self.session_user_id();
        let inner = self.inner.lock();
        if inner.owned_by(user_id.as_ref()) {
            inner.draft.clone()
        } else {
            None
        }
    }

    pub fn errors(&self) -> FieldErrors {
        let user_id = self.session_user_id();
        let inner = self.inner.lock();
        if inner.owned_by(user_id.as_ref()) {
            inner.errors.clone()
        } else {
            FieldErrors::default()
        }
    }

    /// Whether a save or delete is in flight
    pub fn is_busy(&self) -> bool {
        self.locks.is_held(&PROFILE_LOCK)
    }

    pub fn is_confirming_delete(&self) -> bool {
        let user_id = self.session_user_id();
        let inner = self.inner.lock();
        inner.owned_by(user_id.as_ref()) && inner.confirming_delete
    }

    fn session_user_id(&self) -> Option<UserId> {
        self.ctx.session().user().map(|user| user.id)
    }

    /// Lock the editor state for the logged-in user.
    ///
    /// Fails with `AuthRequired` (reported) without a session; state left by
    /// a different user is dropped first.
    fn owned(&self) -> Result<(UserId, MutexGuard<'_, EditorInner>)> {
        let user = self.ctx.require_user()?;
        let mut inner = self.inner.lock();
        inner.adopt(&user.id);
        Ok((user.id, inner))
    }

    // =========================================================================
    // Draft editing
    // =========================================================================

    /// Start editing from the committed user. Idempotent.
    pub fn enter_edit(&self) -> Result<()> {
        let user = self.ctx.require_user()?;

        let mut inner = self.inner.lock();
        inner.adopt(&user.id);
        if inner.draft.is_none() {
            inner.draft = Some(ProfileDraft::from_user(&user));
            inner.errors.clear();
            debug!(user_id = %user.id, "Editing profile");
        }
        Ok(())
    }

    /// Discard the draft, its errors and any pending delete confirmation
    pub fn cancel_edit(&self) {
        let mut inner = self.inner.lock();
        inner.draft = None;
        inner.errors.clear();
        inner.confirming_delete = false;
    }

    pub fn update_field(&self, edit: DraftField) -> Result<()> {
        let (_, mut inner) = self.owned()?;
        let field = edit.field();
        let draft = inner.draft.as_mut().ok_or_else(not_editing)?;
        edit.apply(draft);
        inner.errors.remove(field);
        Ok(())
    }

    /// Add a skill to the draft.
    ///
    /// Only a duplicate is announced; blanks and a full set are silent no-ops.
    pub fn add_skill(&self, skill: &str) -> Result<SkillOutcome> {
        let added = {
            let (_, mut inner) = self.owned()?;
            let draft = inner.draft.as_mut().ok_or_else(not_editing)?;
            let added = draft.skills.try_add(skill);
            if added.is_ok() {
                inner.errors.remove(Field::Skills);
            }
            added
        };

        match added {
            Ok(()) => Ok(SkillOutcome::Added),
            Err(rejection) => {
                if rejection == SkillRejection::Duplicate {
                    self.ctx.notifier().warning("Skill already exists");
                }
                Ok(SkillOutcome::Rejected(rejection))
            }
        }
    }

    pub fn remove_skill(&self, skill: &str) -> Result<SkillOutcome> {
        let (_, mut inner) = self.owned()?;
        let draft = inner.draft.as_mut().ok_or_else(not_editing)?;
        if draft.skills.remove(skill) {
            Ok(SkillOutcome::Removed)
        } else {
            Ok(SkillOutcome::NotFound)
        }
    }

    /// Check the draft; the result is also stored as the current errors.
    ///
    /// Returns no errors when not editing.
    pub fn validate(&self) -> FieldErrors {
        let mut inner = self.inner.lock();
        let errors = inner
            .draft
            .as_ref()
            .map(validate_profile)
            .unwrap_or_default();
        inner.errors = errors.clone();
        errors
    }

    /// Validate and persist the draft.
    ///
    /// Invalid drafts never reach the network. On acknowledgment the sent
    /// draft is merged into the session user and editing ends; on failure
    /// the draft stays and the error is recorded under [`Field::Submit`].
    pub async fn save(&self) -> Result<SaveOutcome> {
        let (owner, draft) = {
            let (owner, inner) = self.owned()?;
            (owner, inner.draft.clone())
        };
        let Some(draft) = draft else {
            let err = not_editing();
            self.ctx.report(&err);
            return Err(err);
        };

        let errors = self.validate();
        if !errors.is_empty() {
            debug!(errors = %errors, "Profile draft rejected locally");
            self.ctx.notifier().error("Please fix the form errors");
            return Err(DevMatchError::Validation(errors));
        }

        let Some(_guard) = self.locks.try_acquire(PROFILE_LOCK) else {
            debug!("Save ignored: profile action in flight");
            return Ok(SaveOutcome::AlreadyPending);
        };
        let epoch = self.inner.lock().epoch;

        let result = self.ctx.gateway().update_profile(&draft).await;

        let saved = {
            let mut inner = self.inner.lock();
            if inner.epoch != epoch {
                debug!("Discarding save result after reset");
                return Ok(SaveOutcome::Discarded);
            }

            match result {
                Ok(()) => {
                    inner.draft = None;
                    inner.errors.clear();
                    Ok(())
                }
                Err(e) => {
                    inner.errors.insert(Field::Submit, e.user_message());
                    Err(e)
                }
            }
        };

        match saved {
            Ok(()) => {
                let mut merged = false;
                self.ctx.session().update_user(|user| {
                    if user.id == owner {
                        draft.apply_to(user);
                        merged = true;
                    }
                });
                if !merged {
                    let err = DevMatchError::invalid_state(
                        "Session changed before the profile save was acknowledged",
                    );
                    self.ctx.report(&err);
                    return Err(err);
                }

                info!(user_id = %owner, "Profile saved");
                self.ctx.notifier().success("Profile updated successfully!");
                self.ctx.notifier().emit(AppEvent::ProfileUpdated);
                Ok(SaveOutcome::Saved)
            }
            Err(e) => {
                self.ctx.report(&e);
                Err(e)
            }
        }
    }

    // =========================================================================
    // Account deletion
    // =========================================================================

    /// Open the delete confirmation
    pub fn request_delete(&self) -> Result<()> {
        let (_, mut inner) = self.owned()?;
        inner.confirming_delete = true;
        Ok(())
    }

    /// Close the delete confirmation without deleting
    pub fn abort_delete(&self) {
        self.inner.lock().confirming_delete = false;
    }

    /// Delete the account after a prior [`request_delete`](Self::request_delete).
    ///
    /// On success the session is cleared right away and the login redirect
    /// follows after the configured delay. The confirmation is closed either
    /// way.
    pub async fn confirm_delete(&self) -> Result<DeleteOutcome> {
        if !self.is_confirming_delete() {
            debug!("Delete not confirmed, nothing sent");
            return Ok(DeleteOutcome::NotRequested);
        }

        let Some(_guard) = self.locks.try_acquire(PROFILE_LOCK) else {
            return Ok(DeleteOutcome::AlreadyPending);
        };

        let result = self.ctx.gateway().delete_profile().await;
        {
            let mut inner = self.inner.lock();
            inner.confirming_delete = false;
            if result.is_ok() {
                inner.draft = None;
                inner.errors.clear();
            }
        }

        if let Err(e) = result {
            self.ctx.report(&e);
            return Err(e);
        }

        let session = self.ctx.session().clone();
        session.clear();
        let epoch = session.epoch();

        info!("Account deleted");
        self.ctx.notifier().success("Account deleted successfully");
        self.ctx.notifier().emit(AppEvent::AccountDeleted);

        let delay = self.ctx.config().delete_redirect_delay();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            session.navigate_if_current(epoch, View::Login);
        });

        Ok(DeleteOutcome::Deleted)
    }

    /// Drop the draft and any pending confirmation
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.draft = None;
        inner.errors.clear();
        inner.confirming_delete = false;
        inner.owner = None;
        inner.epoch += 1;
        drop(inner);
        self.locks.clear();
    }
}

fn not_editing() -> DevMatchError {
    DevMatchError::invalid_state("Profile is not being edited")
}

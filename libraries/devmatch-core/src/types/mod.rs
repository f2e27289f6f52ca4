mod forms;
mod ids;
mod request;
mod skills;
mod status;
mod user;

pub use forms::{LoginCredentials, ProfileDraft, SignupForm};
pub use ids::{RequestId, UserId};
pub use request::PendingRequest;
pub use skills::{SkillRejection, SkillSet, MAX_SKILLS};
pub use status::{ReviewDecision, SendStatus, SwipeDirection};
pub use user::{Gender, User};

use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

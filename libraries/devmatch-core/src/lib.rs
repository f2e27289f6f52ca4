//! DevMatch Core
//!
//! Platform-agnostic domain types, validation rules and error handling for
//! the DevMatch client.
//!
//! This crate provides the building blocks shared by the HTTP gateway
//! (`devmatch-client`) and the state engine (`devmatch-engine`).
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `PendingRequest`, `SkillSet`, `ProfileDraft`, ids
//! - **Validation**: field rules that gate login, signup and profile saves
//! - **Gateway Trait**: the only path through which the engine talks to the backend
//! - **Error Handling**: the classified `DevMatchError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use devmatch_core::types::{ProfileDraft, SkillSet, User, UserId};
//! use devmatch_core::validation::{validate_profile, Field};
//!
//! let user = User::new(UserId::new("u1"), "Ada", "Lovelace");
//! let mut draft = ProfileDraft::from_user(&user);
//! draft.first_name = "A".to_string();
//!
//! let errors = validate_profile(&draft);
//! assert_eq!(
//!     errors.get(Field::FirstName),
//!     Some("First name must be at least 2 characters")
//! );
//!
//! let mut skills = SkillSet::new();
//! assert!(skills.try_add("rust").is_ok());
//! assert!(skills.try_add("rust").is_err());
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use error::{DevMatchError, Result};
pub use traits::Gateway;
pub use validation::{Field, FieldErrors};

pub use types::{
    Gender, LoginCredentials, PendingRequest, ProfileDraft, RequestId, ReviewDecision,
    SendStatus, SignupForm, SkillRejection, SkillSet, SwipeDirection, User, UserId, MAX_SKILLS,
};

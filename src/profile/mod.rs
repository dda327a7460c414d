//! Business profile storage and prompt rendering
//!
//! The profile is one flat record edited field-by-field by the onboarding
//! form and read at call start to build the system instruction.

pub mod prompt;
pub mod store;

pub use prompt::build_system_prompt;
pub use store::{BusinessProfile, ProfileStore, ProfileUpdate};

//! Moderation core: warning escalation and the action log contract.
//!
//! The presentation layer talks to [`ModerationService`] only. Storage is
//! injected as a [`ModerationStore`], normally the SQLite-backed
//! [`kartoteka_database::Database`].

pub mod config;
pub mod error;
pub mod escalation;
pub mod locks;
pub mod service;
pub mod store;
pub mod validate;

pub use config::ModerationConfig;
pub use error::{ModerationError, ModerationResult};
pub use escalation::{AUTOMATIC_MODERATOR, EscalationDecision, MUTE_DURATION, decide};
pub use kartoteka_database::model::actions::{Action, ActionType};
pub use service::{ModerationService, Profile, WarningOutcome};
pub use store::ModerationStore;

//! Warning escalation policy.
//!
//! A subject's 2nd and 5th warning trigger a timed mute, the 3rd and 6th a
//! ban. Nothing is automated past the 6th warning.

use std::time::Duration;

use kartoteka_database::model::actions::ActionType;

use crate::error::{ModerationError, ModerationResult};

/// Length of an automatic mute.
pub const MUTE_DURATION: Duration = Duration::from_secs(3 * 24 * 60 * 60);

/// Moderator identity recorded on escalation actions.
pub const AUTOMATIC_MODERATOR: &str = "automatic";

pub const AUTO_MUTE_REASON: &str = "Automatic mute for accumulated warnings";
pub const AUTO_BAN_REASON: &str = "Automatic ban for accumulated warnings";

/// Enforcement triggered by reaching a warning tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationDecision {
    None,
    Mute { duration: Duration },
    Ban,
}

impl EscalationDecision {
    /// Action type and reason logged for this decision, if it escalates.
    pub fn logged_action(self) -> Option<(ActionType, &'static str)> {
        match self {
            Self::None => None,
            Self::Mute { .. } => Some((ActionType::Mute, AUTO_MUTE_REASON)),
            Self::Ban => Some((ActionType::Ban, AUTO_BAN_REASON)),
        }
    }

    pub fn is_escalation(self) -> bool {
        self != Self::None
    }
}

/// Decide the automatic enforcement for a freshly incremented tally.
///
/// # Errors
/// Returns `InvalidArgument` for a negative count.
pub fn decide(new_warn_count: i64) -> ModerationResult<EscalationDecision> {
    match new_warn_count {
        count if count < 0 => Err(ModerationError::invalid(format!(
            "warn count must be non-negative, got {count}"
        ))),
        2 | 5 => Ok(EscalationDecision::Mute {
            duration: MUTE_DURATION,
        }),
        3 | 6 => Ok(EscalationDecision::Ban),
        _ => Ok(EscalationDecision::None),
    }
}

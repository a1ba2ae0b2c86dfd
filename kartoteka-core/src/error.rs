//! Error types for moderation operations.

use kartoteka_database::model::actions::UnknownActionType;
use thiserror::Error;

/// Errors surfaced by the moderation core.
#[derive(Debug, Error)]
pub enum ModerationError {
    /// I/O, transaction, decode or timeout failure in the store.
    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),

    /// Input rejected before any write happened.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A required record does not exist. No current operation returns this.
    #[error("not found: {0}")]
    NotFound(String),
}

impl ModerationError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

impl From<UnknownActionType> for ModerationError {
    fn from(error: UnknownActionType) -> Self {
        Self::InvalidArgument(error.to_string())
    }
}

pub type ModerationResult<T> = Result<T, ModerationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use kartoteka_database::model::actions::ActionType;

    #[test]
    fn test_error_display() {
        let error = ModerationError::invalid("subject id must not be empty");
        assert_eq!(
            error.to_string(),
            "invalid argument: subject id must not be empty"
        );

        let error = ModerationError::from(anyhow::anyhow!("disk full").context("append failed"));
        assert_eq!(error.to_string(), "storage error: append failed: disk full");
        assert!(error.is_storage());
    }

    #[test]
    fn unknown_action_type_is_an_invalid_argument() {
        let error: ModerationError = "kick".parse::<ActionType>().unwrap_err().into();
        assert!(error.is_invalid_argument());
        assert_eq!(error.to_string(), "invalid argument: unknown action type `kick`");
    }
}

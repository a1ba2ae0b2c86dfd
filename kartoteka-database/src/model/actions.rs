use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of moderation event stored in the action log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Warn,
    Mute,
    Ban,
}

impl ActionType {
    pub const ALL: [ActionType; 3] = [ActionType::Warn, ActionType::Mute, ActionType::Ban];

    /// Value stored in the `actions.action_type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Mute => "mute",
            Self::Ban => "ban",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action type `{0}`")]
pub struct UnknownActionType(pub String);

impl FromStr for ActionType {
    type Err = UnknownActionType;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "warn" => Ok(Self::Warn),
            "mute" => Ok(Self::Mute),
            "ban" => Ok(Self::Ban),
            _ => Err(UnknownActionType(raw.to_owned())),
        }
    }
}

/// One immutable entry of the action log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub id: i64,
    pub subject_id: String,
    pub action_type: ActionType,
    pub reason: String,
    pub moderator_id: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_types_round_trip_through_column_values() {
        for action_type in ActionType::ALL {
            assert_eq!(action_type.as_str().parse::<ActionType>(), Ok(action_type));
        }
    }

    #[test]
    fn parsing_is_case_insensitive_and_rejects_unknown() {
        assert_eq!(" BAN ".parse::<ActionType>(), Ok(ActionType::Ban));
        assert_eq!(
            "kick".parse::<ActionType>(),
            Err(UnknownActionType("kick".to_owned()))
        );
    }
}

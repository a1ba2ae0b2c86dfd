use crate::model::actions::Action;

/// Result of a committed warning: the logged action and the tally it produced.
#[derive(Clone, Debug)]
pub struct WarningRecord {
    pub action: Action,
    pub warn_count: u64,
}

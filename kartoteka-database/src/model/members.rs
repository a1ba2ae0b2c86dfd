use serde::{Deserialize, Serialize};

/// Warning tally for a single subject. Only ever incremented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub subject_id: String,
    pub warn_count: u64,
}

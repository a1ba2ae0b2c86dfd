use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per subject id.
///
/// Operations on the same subject queue behind each other; different
/// subjects never contend.
#[derive(Clone, Default)]
pub struct SubjectLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl SubjectLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `subject_id`. Released when the guard drops.
    pub async fn lock(&self, subject_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(subject_id.to_owned())
            .or_default()
            .value()
            .clone();
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_subject_is_exclusive() {
        let locks = SubjectLocks::new();
        let guard = locks.lock("100").await;

        let blocked = tokio::time::timeout(Duration::from_millis(50), locks.lock("100")).await;
        assert!(blocked.is_err());

        drop(guard);
        let reacquired = tokio::time::timeout(Duration::from_millis(50), locks.lock("100")).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn different_subjects_do_not_contend() {
        let locks = SubjectLocks::new();
        let _first = locks.lock("100").await;

        let other = tokio::time::timeout(Duration::from_millis(50), locks.lock("200")).await;
        assert!(other.is_ok());
    }
}

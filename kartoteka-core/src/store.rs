//! Storage seam owned by the moderation service.

use async_trait::async_trait;

use kartoteka_database::{
    Database,
    impls::{
        actions::{NewAction, actions_for_subject, append_action, count_actions_by_type},
        members::{get_warn_count, increment_warn_count},
        warnings::record_warning,
    },
    model::{
        actions::{Action, ActionType},
        warnings::WarningRecord,
    },
};

/// Durable backing for the action log and member tallies.
#[async_trait]
pub trait ModerationStore: Send + Sync {
    /// Append an action, assigning its id and timestamp.
    async fn append_action(
        &self,
        subject_id: &str,
        action_type: ActionType,
        reason: &str,
        moderator_id: &str,
    ) -> anyhow::Result<Action>;

    /// All actions for a subject, most recent first.
    async fn list_for_subject(&self, subject_id: &str) -> anyhow::Result<Vec<Action>>;

    async fn count_by_type(&self, subject_id: &str, action_type: ActionType)
    -> anyhow::Result<u64>;

    async fn get_warn_count(&self, subject_id: &str) -> anyhow::Result<u64>;

    async fn increment_warn_count(&self, subject_id: &str) -> anyhow::Result<u64>;

    /// Append a warn action and increment the tally as one atomic unit.
    async fn record_warning(
        &self,
        subject_id: &str,
        moderator_id: &str,
        reason: &str,
    ) -> anyhow::Result<WarningRecord>;
}

#[async_trait]
impl ModerationStore for Database {
    async fn append_action(
        &self,
        subject_id: &str,
        action_type: ActionType,
        reason: &str,
        moderator_id: &str,
    ) -> anyhow::Result<Action> {
        append_action(
            self,
            NewAction {
                subject_id,
                action_type,
                reason,
                moderator_id,
            },
        )
        .await
    }

    async fn list_for_subject(&self, subject_id: &str) -> anyhow::Result<Vec<Action>> {
        actions_for_subject(self, subject_id).await
    }

    async fn count_by_type(
        &self,
        subject_id: &str,
        action_type: ActionType,
    ) -> anyhow::Result<u64> {
        count_actions_by_type(self, subject_id, action_type).await
    }

    async fn get_warn_count(&self, subject_id: &str) -> anyhow::Result<u64> {
        get_warn_count(self, subject_id).await
    }

    async fn increment_warn_count(&self, subject_id: &str) -> anyhow::Result<u64> {
        increment_warn_count(self, subject_id).await
    }

    async fn record_warning(
        &self,
        subject_id: &str,
        moderator_id: &str,
        reason: &str,
    ) -> anyhow::Result<WarningRecord> {
        record_warning(self, subject_id, moderator_id, reason).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn database_store_through_trait_object() {
        let store: Arc<dyn ModerationStore> = Arc::new(Database::connect_in_memory().await.unwrap());

        assert_eq!(store.increment_warn_count("100").await.unwrap(), 1);
        let warning = store.record_warning("100", "mod1", "spam").await.unwrap();
        assert_eq!(warning.warn_count, 2);

        store
            .append_action("100", ActionType::Mute, "loud", "mod1")
            .await
            .unwrap();

        assert_eq!(store.get_warn_count("100").await.unwrap(), 2);
        assert_eq!(store.count_by_type("100", ActionType::Warn).await.unwrap(), 1);
        assert_eq!(store.count_by_type("100", ActionType::Mute).await.unwrap(), 1);

        let history = store.list_for_subject("100").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].action_type, ActionType::Mute);
    }
}

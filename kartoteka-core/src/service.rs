//! Moderation service
//!
//! Orchestrates the action log, member tallies and the escalation engine.
//! Every operation on a subject runs under that subject's lock and every
//! storage call is bounded by [`ModerationConfig::storage_timeout`].

use std::future::Future;
use std::sync::Arc;

use tracing::{error, info};

use kartoteka_database::model::actions::{Action, ActionType};

use crate::config::ModerationConfig;
use crate::error::{ModerationError, ModerationResult};
use crate::escalation::{AUTOMATIC_MODERATOR, EscalationDecision, decide};
use crate::locks::SubjectLocks;
use crate::store::ModerationStore;
use crate::validate;

/// Result of [`ModerationService::record_warning`].
#[derive(Debug)]
pub struct WarningOutcome {
    /// The logged warn action.
    pub warning: Action,
    /// Tally after this warning.
    pub new_tally: u64,
    /// Enforcement the presentation layer must apply on the platform.
    pub escalation: EscalationDecision,
    /// Logging of the automatic mute/ban, `None` when nothing escalated.
    ///
    /// An `Err` here means the warning is recorded and `escalation` is still
    /// due, but the log has no entry for it.
    pub escalation_action: Option<ModerationResult<Action>>,
}

impl WarningOutcome {
    /// The automatic action, if one was logged.
    pub fn logged_escalation(&self) -> Option<&Action> {
        self.escalation_action
            .as_ref()
            .and_then(|result| result.as_ref().ok())
    }

    /// `true` when an escalation was due but could not be logged.
    pub fn escalation_log_failed(&self) -> bool {
        matches!(self.escalation_action, Some(Err(_)))
    }
}

/// Summary counts for one subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Profile {
    pub warn_count: u64,
    pub mute_count: u64,
    pub ban_count: u64,
}

#[derive(Clone)]
pub struct ModerationService {
    store: Arc<dyn ModerationStore>,
    locks: SubjectLocks,
    config: ModerationConfig,
}

impl ModerationService {
    pub fn new(store: Arc<dyn ModerationStore>, config: ModerationConfig) -> Self {
        Self {
            store,
            locks: SubjectLocks::new(),
            config,
        }
    }

    /// Warn a subject and apply the escalation policy to the new tally.
    ///
    /// The warn action and tally bump commit together. If logging the
    /// escalation action fails afterwards, the warning stays recorded and the
    /// outcome still carries the decision, with the failure in
    /// [`WarningOutcome::escalation_action`].
    ///
    /// A storage timeout on the warn write itself is reported as `Storage`,
    /// but the transaction may still have committed.
    ///
    /// # Errors
    /// `InvalidArgument` for malformed input, `Storage` for store failures.
    pub async fn record_warning(
        &self,
        subject_id: &str,
        moderator_id: &str,
        reason: &str,
    ) -> ModerationResult<WarningOutcome> {
        validate::subject_id(subject_id)?;
        validate::moderator_id(moderator_id)?;
        validate::reason(reason)?;

        let _guard = self.locks.lock(subject_id).await;

        let record = self
            .bounded(self.store.record_warning(subject_id, moderator_id, reason))
            .await?;

        let tally = i64::try_from(record.warn_count).map_err(|_| {
            ModerationError::Storage(anyhow::anyhow!(
                "warn tally {} out of range",
                record.warn_count
            ))
        })?;
        let escalation = decide(tally)?;

        let escalation_action = match escalation.logged_action() {
            Some((action_type, auto_reason)) => {
                info!(
                    subject_id,
                    warn_count = record.warn_count,
                    action_type = %action_type,
                    "escalation triggered"
                );

                let action = self
                    .bounded(self.store.append_action(
                        subject_id,
                        action_type,
                        auto_reason,
                        AUTOMATIC_MODERATOR,
                    ))
                    .await
                    .inspect_err(|source| {
                        error!(
                            %source,
                            subject_id,
                            warn_count = record.warn_count,
                            "failed to log escalation action; enforcement still due"
                        );
                    });
                Some(action)
            }
            None => None,
        };

        Ok(WarningOutcome {
            warning: record.action,
            new_tally: record.warn_count,
            escalation,
            escalation_action,
        })
    }

    /// Log a mute. Applying the timeout on the platform is the caller's job.
    pub async fn record_mute(
        &self,
        subject_id: &str,
        moderator_id: &str,
        reason: &str,
    ) -> ModerationResult<Action> {
        self.record_manual(subject_id, ActionType::Mute, moderator_id, reason)
            .await
    }

    /// Log a ban. Applying the ban on the platform is the caller's job.
    pub async fn record_ban(
        &self,
        subject_id: &str,
        moderator_id: &str,
        reason: &str,
    ) -> ModerationResult<Action> {
        self.record_manual(subject_id, ActionType::Ban, moderator_id, reason)
            .await
    }

    pub async fn get_profile(&self, subject_id: &str) -> ModerationResult<Profile> {
        validate::subject_id(subject_id)?;

        let _guard = self.locks.lock(subject_id).await;

        let warn_count = self.bounded(self.store.get_warn_count(subject_id)).await?;
        let mute_count = self
            .bounded(self.store.count_by_type(subject_id, ActionType::Mute))
            .await?;
        let ban_count = self
            .bounded(self.store.count_by_type(subject_id, ActionType::Ban))
            .await?;

        Ok(Profile {
            warn_count,
            mute_count,
            ban_count,
        })
    }

    /// Full action history, most recent first. Empty for unknown subjects.
    pub async fn get_history(&self, subject_id: &str) -> ModerationResult<Vec<Action>> {
        validate::subject_id(subject_id)?;

        let _guard = self.locks.lock(subject_id).await;
        self.bounded(self.store.list_for_subject(subject_id)).await
    }

    pub async fn count_actions(
        &self,
        subject_id: &str,
        action_type: ActionType,
    ) -> ModerationResult<u64> {
        validate::subject_id(subject_id)?;

        let _guard = self.locks.lock(subject_id).await;
        self.bounded(self.store.count_by_type(subject_id, action_type))
            .await
    }

    async fn record_manual(
        &self,
        subject_id: &str,
        action_type: ActionType,
        moderator_id: &str,
        reason: &str,
    ) -> ModerationResult<Action> {
        validate::subject_id(subject_id)?;
        validate::moderator_id(moderator_id)?;
        validate::reason(reason)?;

        let _guard = self.locks.lock(subject_id).await;
        let action = self
            .bounded(
                self.store
                    .append_action(subject_id, action_type, reason, moderator_id),
            )
            .await?;

        info!(
            subject_id,
            moderator_id,
            action_type = %action_type,
            action_id = action.id,
            "moderation action recorded"
        );

        Ok(action)
    }

    async fn bounded<T, F>(&self, operation: F) -> ModerationResult<T>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        let timeout = self.config.storage_timeout;
        match tokio::time::timeout(timeout, operation).await {
            Ok(result) => result.map_err(ModerationError::Storage),
            Err(_) => Err(ModerationError::Storage(anyhow::anyhow!(
                "storage operation timed out after {timeout:?}"
            ))),
        }
    }
}

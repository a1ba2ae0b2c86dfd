use anyhow::Context as _;

use crate::{
    database::Database,
    impls::{
        actions::{NewAction, insert_action},
        members::bump_warn_count,
    },
    model::{actions::ActionType, warnings::WarningRecord},
};

/// Log a warning and bump the subject's tally in one transaction.
///
/// Either both writes commit or neither does.
pub async fn record_warning(
    db: &Database,
    subject_id: &str,
    moderator_id: &str,
    reason: &str,
) -> anyhow::Result<WarningRecord> {
    let mut tx = db
        .pool()
        .begin()
        .await
        .context("failed to begin warning transaction")?;

    let action = insert_action(
        &mut tx,
        NewAction {
            subject_id,
            action_type: ActionType::Warn,
            reason,
            moderator_id,
        },
    )
    .await?;

    let warn_count = bump_warn_count(&mut tx, subject_id).await?;

    tx.commit()
        .await
        .context("failed to commit warning transaction")?;

    Ok(WarningRecord { action, warn_count })
}

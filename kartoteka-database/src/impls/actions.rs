use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::{
    database::Database,
    model::actions::{Action, ActionType},
};

pub struct NewAction<'a> {
    pub subject_id: &'a str,
    pub action_type: ActionType,
    pub reason: &'a str,
    pub moderator_id: &'a str,
}

#[derive(sqlx::FromRow)]
struct ActionRow {
    id: i64,
    user_id: String,
    action_type: String,
    reason: String,
    moderator: String,
    timestamp: DateTime<Utc>,
}

/// Append one action to the log and return it with its assigned id and timestamp.
pub async fn append_action(db: &Database, new_action: NewAction<'_>) -> anyhow::Result<Action> {
    let mut conn = db.pool().acquire().await?;
    insert_action(&mut conn, new_action).await
}

pub(crate) async fn insert_action(
    conn: &mut SqliteConnection,
    new_action: NewAction<'_>,
) -> anyhow::Result<Action> {
    let row: ActionRow = sqlx::query_as(
        "INSERT INTO actions (user_id, action_type, reason, moderator, timestamp)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, user_id, action_type, reason, moderator, timestamp",
    )
    .bind(new_action.subject_id)
    .bind(new_action.action_type.as_str())
    .bind(new_action.reason)
    .bind(new_action.moderator_id)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await
    .with_context(|| format!("failed to append {} action", new_action.action_type))?;

    to_action(row)
}

/// Every action recorded against a subject, most recent first.
pub async fn actions_for_subject(db: &Database, subject_id: &str) -> anyhow::Result<Vec<Action>> {
    let rows: Vec<ActionRow> = sqlx::query_as(
        "SELECT id, user_id, action_type, reason, moderator, timestamp
         FROM actions
         WHERE user_id = $1
         ORDER BY timestamp DESC, id DESC",
    )
    .bind(subject_id)
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(to_action).collect()
}

pub async fn count_actions_by_type(
    db: &Database,
    subject_id: &str,
    action_type: ActionType,
) -> anyhow::Result<u64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM actions WHERE user_id = $1 AND action_type = $2")
            .bind(subject_id)
            .bind(action_type.as_str())
            .fetch_one(db.pool())
            .await?;

    u64::try_from(count).context("action count out of u64 range")
}

fn to_action(row: ActionRow) -> anyhow::Result<Action> {
    let action_type = row
        .action_type
        .parse::<ActionType>()
        .with_context(|| format!("action {} has a corrupt type", row.id))?;

    Ok(Action {
        id: row.id,
        subject_id: row.user_id,
        action_type,
        reason: row.reason,
        moderator_id: row.moderator,
        timestamp: row.timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_action<'a>(subject_id: &'a str, action_type: ActionType, reason: &'a str) -> NewAction<'a> {
        NewAction {
            subject_id,
            action_type,
            reason,
            moderator_id: "mod1",
        }
    }

    #[tokio::test]
    async fn appended_actions_get_increasing_ids() {
        let db = Database::connect_in_memory().await.unwrap();

        let first = append_action(&db, new_action("100", ActionType::Warn, "spam"))
            .await
            .unwrap();
        let second = append_action(&db, new_action("100", ActionType::Ban, "raid"))
            .await
            .unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.subject_id, "100");
        assert_eq!(first.action_type, ActionType::Warn);
        assert_eq!(first.reason, "spam");
        assert_eq!(first.moderator_id, "mod1");
        assert!(second.timestamp >= first.timestamp);
    }

    #[tokio::test]
    async fn history_is_most_recent_first_and_scoped_to_subject() {
        let db = Database::connect_in_memory().await.unwrap();

        let a = append_action(&db, new_action("100", ActionType::Warn, "one"))
            .await
            .unwrap();
        append_action(&db, new_action("200", ActionType::Warn, "other"))
            .await
            .unwrap();
        let b = append_action(&db, new_action("100", ActionType::Mute, "two"))
            .await
            .unwrap();
        let c = append_action(&db, new_action("100", ActionType::Ban, "three"))
            .await
            .unwrap();

        let history = actions_for_subject(&db, "100").await.unwrap();
        let ids: Vec<i64> = history.iter().map(|action| action.id).collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);

        assert!(actions_for_subject(&db, "300").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn counts_by_type() {
        let db = Database::connect_in_memory().await.unwrap();

        for reason in ["a", "b"] {
            append_action(&db, new_action("100", ActionType::Warn, reason))
                .await
                .unwrap();
        }
        append_action(&db, new_action("100", ActionType::Ban, "c"))
            .await
            .unwrap();

        assert_eq!(count_actions_by_type(&db, "100", ActionType::Warn).await.unwrap(), 2);
        assert_eq!(count_actions_by_type(&db, "100", ActionType::Ban).await.unwrap(), 1);
        assert_eq!(count_actions_by_type(&db, "100", ActionType::Mute).await.unwrap(), 0);
        assert_eq!(count_actions_by_type(&db, "999", ActionType::Warn).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn corrupt_action_type_is_reported() {
        let db = Database::connect_in_memory().await.unwrap();

        sqlx::query(
            "INSERT INTO actions (user_id, action_type, reason, moderator) VALUES ('100', 'kick', 'x', 'mod1')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        assert!(actions_for_subject(&db, "100").await.is_err());
    }
}

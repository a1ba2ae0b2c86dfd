use anyhow::Context as _;
use sqlx::SqliteConnection;

use crate::{database::Database, model::members::MemberRecord};

#[derive(sqlx::FromRow)]
struct MemberRow {
    user_id: String,
    warns: i64,
}

pub async fn get_member(db: &Database, subject_id: &str) -> anyhow::Result<Option<MemberRecord>> {
    let row: Option<MemberRow> = sqlx::query_as("SELECT user_id, warns FROM users WHERE user_id = $1")
        .bind(subject_id)
        .fetch_optional(db.pool())
        .await?;

    row.map(|row| -> anyhow::Result<MemberRecord> {
        let warn_count = u64::try_from(row.warns).context("warns row out of u64 range")?;
        Ok(MemberRecord {
            subject_id: row.user_id,
            warn_count,
        })
    })
    .transpose()
}

/// Current warning tally, 0 for a subject that was never warned.
pub async fn get_warn_count(db: &Database, subject_id: &str) -> anyhow::Result<u64> {
    Ok(get_member(db, subject_id)
        .await?
        .map_or(0, |member| member.warn_count))
}

/// Increment the tally and return the new value, creating the record at 1.
pub async fn increment_warn_count(db: &Database, subject_id: &str) -> anyhow::Result<u64> {
    let mut conn = db.pool().acquire().await?;
    bump_warn_count(&mut conn, subject_id).await
}

pub(crate) async fn bump_warn_count(
    conn: &mut SqliteConnection,
    subject_id: &str,
) -> anyhow::Result<u64> {
    let warns: i64 = sqlx::query_scalar(
        "INSERT INTO users (user_id, warns) VALUES ($1, 1)
         ON CONFLICT (user_id) DO UPDATE SET warns = warns + 1
         RETURNING warns",
    )
    .bind(subject_id)
    .fetch_one(&mut *conn)
    .await
    .context("failed to increment warn tally")?;

    u64::try_from(warns).context("warns out of u64 range")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_subject_has_no_record_and_zero_tally() {
        let db = Database::connect_in_memory().await.unwrap();

        assert!(get_member(&db, "100").await.unwrap().is_none());
        assert_eq!(get_warn_count(&db, "100").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn increment_creates_then_bumps() {
        let db = Database::connect_in_memory().await.unwrap();

        assert_eq!(increment_warn_count(&db, "100").await.unwrap(), 1);
        assert_eq!(increment_warn_count(&db, "100").await.unwrap(), 2);
        assert_eq!(increment_warn_count(&db, "200").await.unwrap(), 1);

        let member = get_member(&db, "100").await.unwrap().unwrap();
        assert_eq!(
            member,
            MemberRecord {
                subject_id: "100".to_owned(),
                warn_count: 2,
            }
        );
    }
}

//! Applies moderation decisions on the platform.
//!
//! Failures here never touch the moderation log: the recorded action stands
//! and the caller reports the failure to the moderator.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};

use kartoteka_core::EscalationDecision;
use kartoteka_core::escalation::{AUTO_BAN_REASON, AUTO_MUTE_REASON};
use kartoteka_utils::formatting::truncate_chars;

use crate::moderation::embeds::{ban_notice_embed, is_missing_permissions_error};

const AUDIT_REASON_LIMIT: usize = 512;
const BAN_NOTICE_TIMEOUT: Duration = Duration::from_secs(3);

/// What happened on the platform after an action was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enforcement {
    NotNeeded,
    Applied,
    Failed,
}

impl Enforcement {
    fn from_result(kind: &str, user_id: serenity::UserId, result: anyhow::Result<()>) -> Self {
        match result {
            Ok(()) => {
                info!(user_id = user_id.get(), kind, "enforcement applied");
                Self::Applied
            }
            Err(source) => {
                let missing_permissions = source
                    .downcast_ref::<serenity::Error>()
                    .is_some_and(is_missing_permissions_error);
                if missing_permissions {
                    warn!(user_id = user_id.get(), kind, "missing permissions for enforcement");
                } else {
                    error!(user_id = user_id.get(), kind, ?source, "enforcement request failed");
                }
                Self::Failed
            }
        }
    }
}

/// Time out a member until `duration` from now.
pub async fn apply_timeout(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    duration: Duration,
    reason: &str,
) -> Enforcement {
    let result = timeout_member(http, guild_id, user_id, duration, reason).await;
    Enforcement::from_result("timeout", user_id, result)
}

pub async fn apply_ban(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    reason: &str,
) -> Enforcement {
    let audit_reason = truncate_chars(reason, AUDIT_REASON_LIMIT);
    let result = guild_id
        .ban_with_reason(http, user_id, 0, &audit_reason)
        .await
        .context("ban request failed");
    Enforcement::from_result("ban", user_id, result)
}

/// Carry out an automatic escalation decided by the core.
pub async fn enforce_escalation(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    decision: EscalationDecision,
) -> Enforcement {
    match decision {
        EscalationDecision::None => Enforcement::NotNeeded,
        EscalationDecision::Mute { duration } => {
            apply_timeout(http, guild_id, user_id, duration, AUTO_MUTE_REASON).await
        }
        EscalationDecision::Ban => apply_ban(http, guild_id, user_id, AUTO_BAN_REASON).await,
    }
}

/// Tell a member they are being banned. Failures are only logged.
pub async fn notify_ban(
    http: &serenity::Http,
    target: &serenity::User,
    guild_id: serenity::GuildId,
    reason: &str,
) {
    let send = async {
        let guild_name = match guild_id.to_partial_guild(http).await {
            Ok(guild) => guild.name,
            Err(_) => format!("Server {}", guild_id.get()),
        };
        let dm_channel = target.create_dm_channel(http).await?;
        dm_channel
            .send_message(
                http,
                serenity::CreateMessage::new().embed(ban_notice_embed(&guild_name, reason)),
            )
            .await?;
        Ok::<(), serenity::Error>(())
    };

    match tokio::time::timeout(BAN_NOTICE_TIMEOUT, send).await {
        Ok(Ok(())) => debug!(user_id = target.id.get(), "ban notice delivered"),
        Ok(Err(source)) => debug!(user_id = target.id.get(), ?source, "ban notice not delivered"),
        Err(_) => debug!(user_id = target.id.get(), "ban notice timed out"),
    }
}

async fn timeout_member(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    duration: Duration,
    reason: &str,
) -> anyhow::Result<()> {
    let until_system_time = SystemTime::now()
        .checked_add(duration)
        .unwrap_or(SystemTime::now());
    let until_unix = until_system_time
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs()) as i64;
    let until = serenity::Timestamp::from_unix_timestamp(until_unix)
        .context("timeout end is out of range")?;

    let audit_reason = truncate_chars(reason, AUDIT_REASON_LIMIT);
    let edit = serenity::EditMember::new()
        .disable_communication_until_datetime(until)
        .audit_log_reason(&audit_reason);
    guild_id
        .edit_member(http, user_id, edit)
        .await
        .context("timeout request failed")?;

    Ok(())
}

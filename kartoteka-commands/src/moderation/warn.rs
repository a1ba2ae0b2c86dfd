use poise::serenity_prelude as serenity;

use kartoteka_core::{EscalationDecision, ModerationResult, WarningOutcome};
use kartoteka_utils::formatting::{escape_mentions, format_compact_duration};

use crate::moderation::embeds::{failure_message, guild_only_message, moderator_label};
use crate::moderation::enforcement::{Enforcement, enforce_escalation};
use crate::{CommandMeta, Context, Data, Error};

pub const META: CommandMeta = CommandMeta {
    name: "warn",
    desc: "Warn a user. Repeated warnings escalate to a mute or a ban.",
    category: "moderation",
    usage: "/warn <user> <reason>",
};

#[poise::command(
    slash_command,
    guild_only,
    category = "Moderation",
    required_permissions = "MODERATE_MEMBERS",
    default_member_permissions = "MODERATE_MEMBERS"
)]
pub async fn warn(
    ctx: Context<'_>,
    #[description = "The user to warn"] user: serenity::User,
    #[description = "Reason for the warning"] reason: String,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    // Escalations hit the platform before the reply, past the response window.
    ctx.defer_ephemeral().await?;

    let reply = match warn_member(
        ctx.http(),
        ctx.data(),
        guild_id,
        user.id,
        &moderator_label(ctx.author()),
        &reason,
    )
    .await
    {
        Ok((outcome, enforcement)) => warning_reply(user.id, &reason, &outcome, enforcement),
        Err(source) => failure_message(&source),
    };

    ctx.send(
        poise::CreateReply::default()
            .content(reply)
            .ephemeral(true)
            .allowed_mentions(serenity::CreateAllowedMentions::new()),
    )
    .await?;

    Ok(())
}

/// Record a warning, then apply whatever escalation it triggered.
pub(crate) async fn warn_member(
    http: &serenity::Http,
    data: &Data,
    guild_id: serenity::GuildId,
    target: serenity::UserId,
    moderator: &str,
    reason: &str,
) -> ModerationResult<(WarningOutcome, Enforcement)> {
    let outcome = data
        .moderation
        .record_warning(&target.get().to_string(), moderator, reason)
        .await?;
    let enforcement = enforce_escalation(http, guild_id, target, outcome.escalation).await;
    Ok((outcome, enforcement))
}

pub fn warning_reply(
    target: serenity::UserId,
    reason: &str,
    outcome: &WarningOutcome,
    enforcement: Enforcement,
) -> String {
    let mut reply = format!(
        "<@{}> has been warned (warning #{}).\n**Reason :** {}",
        target.get(),
        outcome.new_tally,
        escape_mentions(reason)
    );

    let escalation = match outcome.escalation {
        EscalationDecision::None => None,
        EscalationDecision::Mute { duration } => Some(format!(
            "{} timeout",
            format_compact_duration(duration.as_secs())
        )),
        EscalationDecision::Ban => Some("ban".to_owned()),
    };

    if let Some(escalation) = escalation {
        let line = match enforcement {
            Enforcement::Failed => format!(
                "\nAutomatic {escalation} could not be applied. Check role hierarchy and permissions."
            ),
            _ => format!("\nAutomatic {escalation} applied."),
        };
        reply.push_str(&line);

        if outcome.escalation_log_failed() {
            reply.push_str(&format!(
                "\nThe automatic {escalation} could not be written to the moderation log."
            ));
        }
    }

    reply
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use poise::serenity_prelude as serenity;

    use kartoteka_core::{
        Action, ActionType, EscalationDecision, MUTE_DURATION, ModerationError, WarningOutcome,
    };

    use super::warning_reply;
    use crate::moderation::enforcement::Enforcement;

    fn outcome(new_tally: u64, escalation: EscalationDecision) -> WarningOutcome {
        WarningOutcome {
            warning: Action {
                id: 1,
                subject_id: "42".to_owned(),
                action_type: ActionType::Warn,
                reason: "spam".to_owned(),
                moderator_id: "mod".to_owned(),
                timestamp: Utc::now(),
            },
            new_tally,
            escalation,
            escalation_action: None,
        }
    }

    #[test]
    fn plain_warning_reply() {
        let reply = warning_reply(
            serenity::UserId::new(42),
            "spam",
            &outcome(1, EscalationDecision::None),
            Enforcement::NotNeeded,
        );
        assert_eq!(reply, "<@42> has been warned (warning #1).\n**Reason :** spam");
    }

    #[test]
    fn escalation_outcome_is_reported() {
        let muted = warning_reply(
            serenity::UserId::new(42),
            "spam",
            &outcome(2, EscalationDecision::Mute { duration: MUTE_DURATION }),
            Enforcement::Applied,
        );
        assert!(muted.ends_with("Automatic 3d timeout applied."));

        let failed_ban = warning_reply(
            serenity::UserId::new(42),
            "spam",
            &outcome(3, EscalationDecision::Ban),
            Enforcement::Failed,
        );
        assert!(failed_ban.contains("Automatic ban could not be applied"));
        assert!(!failed_ban.contains("moderation log"));
    }

    #[test]
    fn unlogged_escalation_is_still_reported_as_applied() {
        let mut unlogged = outcome(2, EscalationDecision::Mute { duration: MUTE_DURATION });
        unlogged.escalation_action = Some(Err(ModerationError::Storage(anyhow::anyhow!(
            "insert rejected"
        ))));

        let reply = warning_reply(
            serenity::UserId::new(42),
            "spam",
            &unlogged,
            Enforcement::Applied,
        );
        assert!(reply.contains("Automatic 3d timeout applied."));
        assert!(reply.ends_with("could not be written to the moderation log."));
    }
}

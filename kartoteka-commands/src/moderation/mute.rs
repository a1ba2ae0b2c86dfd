use poise::serenity_prelude as serenity;

use kartoteka_core::MUTE_DURATION;
use kartoteka_utils::formatting::{escape_mentions, format_compact_duration};

use crate::moderation::embeds::{failure_message, guild_only_message, moderator_label};
use crate::moderation::enforcement::{Enforcement, apply_timeout};
use crate::{CommandMeta, Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "mute",
    desc: "Time out a user for three days.",
    category: "moderation",
    usage: "/mute <user> [reason]",
};

#[poise::command(
    slash_command,
    guild_only,
    category = "Moderation",
    required_permissions = "MODERATE_MEMBERS",
    default_member_permissions = "MODERATE_MEMBERS"
)]
pub async fn mute(
    ctx: Context<'_>,
    #[description = "The user to mute"] user: serenity::User,
    #[description = "Reason for the mute"] reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let duration_label = format_compact_duration(MUTE_DURATION.as_secs());
    let reason = reason
        .filter(|reason| !reason.trim().is_empty())
        .unwrap_or_else(|| format!("Muted for {duration_label}"));

    let recorded = ctx
        .data()
        .moderation
        .record_mute(&user.id.get().to_string(), &moderator_label(ctx.author()), &reason)
        .await;

    let reply = match recorded {
        Ok(_) => {
            let enforcement =
                apply_timeout(ctx.http(), guild_id, user.id, MUTE_DURATION, &reason).await;
            mute_reply(user.id, &reason, &duration_label, enforcement)
        }
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

fn mute_reply(
    target: serenity::UserId,
    reason: &str,
    duration_label: &str,
    enforcement: Enforcement,
) -> String {
    let mut reply = format!(
        "<@{}> has been muted.\n**Reason :** {}\n**Duration :** {}",
        target.get(),
        escape_mentions(reason),
        duration_label
    );
    if enforcement == Enforcement::Failed {
        reply.push_str(
            "\nThe mute was recorded but the timeout could not be applied. Check role hierarchy and permissions.",
        );
    }
    reply
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude as serenity;

    use super::mute_reply;
    use crate::moderation::enforcement::Enforcement;

    #[test]
    fn reply_lists_reason_and_duration() {
        let reply = mute_reply(serenity::UserId::new(5), "flood", "3d", Enforcement::Applied);
        assert_eq!(
            reply,
            "<@5> has been muted.\n**Reason :** flood\n**Duration :** 3d"
        );
        assert!(
            mute_reply(serenity::UserId::new(5), "flood", "3d", Enforcement::Failed)
                .contains("could not be applied")
        );
    }
}

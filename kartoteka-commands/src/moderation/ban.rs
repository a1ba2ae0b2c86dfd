use poise::serenity_prelude as serenity;

use kartoteka_core::{Action, ModerationResult};
use kartoteka_utils::formatting::escape_mentions;

use crate::moderation::embeds::{failure_message, guild_only_message, moderator_label};
use crate::moderation::enforcement::{Enforcement, apply_ban, notify_ban};
use crate::{CommandMeta, Context, Data, Error};

pub const META: CommandMeta = CommandMeta {
    name: "ban",
    desc: "Ban a user from the server.",
    category: "moderation",
    usage: "/ban <user> <reason>",
};

#[poise::command(
    slash_command,
    guild_only,
    category = "Moderation",
    required_permissions = "BAN_MEMBERS",
    default_member_permissions = "BAN_MEMBERS"
)]
pub async fn ban(
    ctx: Context<'_>,
    #[description = "The user to ban"] user: serenity::User,
    #[description = "Reason for the ban"] reason: String,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if user.id == ctx.author().id {
        ctx.say("You can't ban yourself.").await?;
        return Ok(());
    }

    // Slash command tokens expire after three seconds without a response.
    ctx.defer_ephemeral().await?;

    let reply = match ban_member(
        ctx.http(),
        ctx.data(),
        guild_id,
        &user,
        &moderator_label(ctx.author()),
        &reason,
    )
    .await
    {
        Ok((_, enforcement)) => ban_reply(user.id, &reason, enforcement),
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

/// Notify the member, ban them, then record the ban.
///
/// The reason is checked up front so a rejected reason neither notifies nor
/// bans. The ban is recorded even when the platform refuses it.
pub(crate) async fn ban_member(
    http: &serenity::Http,
    data: &Data,
    guild_id: serenity::GuildId,
    target: &serenity::User,
    moderator: &str,
    reason: &str,
) -> ModerationResult<(Action, Enforcement)> {
    kartoteka_core::validate::reason(reason)?;

    notify_ban(http, target, guild_id, reason).await;
    let enforcement = apply_ban(http, guild_id, target.id, reason).await;
    let action = data
        .moderation
        .record_ban(&target.id.get().to_string(), moderator, reason)
        .await?;

    Ok((action, enforcement))
}

pub(crate) fn ban_reply(target: serenity::UserId, reason: &str, enforcement: Enforcement) -> String {
    let mut reply = format!(
        "<@{}> has been banned.\n**Reason :** {}",
        target.get(),
        escape_mentions(reason)
    );
    if enforcement == Enforcement::Failed {
        reply.push_str(
            "\nThe ban was recorded but could not be applied. Check role hierarchy and permissions.",
        );
    }
    reply
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude as serenity;

    use super::ban_reply;
    use crate::moderation::enforcement::Enforcement;

    #[test]
    fn reply_mentions_platform_failure() {
        let applied = ban_reply(serenity::UserId::new(9), "raid @everyone", Enforcement::Applied);
        assert_eq!(applied, "<@9> has been banned.\n**Reason :** raid @\u{200B}everyone");

        let failed = ban_reply(serenity::UserId::new(9), "raid", Enforcement::Failed);
        assert!(failed.contains("recorded but could not be applied"));
    }
}

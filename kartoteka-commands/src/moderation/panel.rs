use poise::serenity_prelude as serenity;
use tracing::error;

use kartoteka_core::validate::MAX_REASON_CHARS;

use crate::moderation::ban::{ban_member, ban_reply};
use crate::moderation::embeds::{
    failure_message, guild_only_message, missing_permission_message, moderator_label,
    panel_buttons, profile_embed,
};
use crate::moderation::history::history_message;
use crate::moderation::render::{FormSubmission, REASON_INPUT_ID, RenderRequest};
use crate::moderation::warn::{warn_member, warning_reply};
use crate::{CommandMeta, Context, Data, Error};

pub const META: CommandMeta = CommandMeta {
    name: "kartoteka",
    desc: "Show a user's moderation record with quick actions.",
    category: "moderation",
    usage: "/kartoteka <user>",
};

#[poise::command(
    slash_command,
    guild_only,
    category = "Moderation",
    required_permissions = "MODERATE_MEMBERS",
    default_member_permissions = "MODERATE_MEMBERS"
)]
pub async fn kartoteka(
    ctx: Context<'_>,
    #[description = "The user to look up"] user: serenity::User,
) -> Result<(), Error> {
    let profile = match ctx
        .data()
        .moderation
        .get_profile(&user.id.get().to_string())
        .await
    {
        Ok(profile) => profile,
        Err(source) => {
            ctx.send(
                poise::CreateReply::default()
                    .content(failure_message(&source))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }
    };

    ctx.send(
        poise::CreateReply::default()
            .embed(profile_embed(&user, profile))
            .components(panel_buttons(user.id))
            .ephemeral(true),
    )
    .await?;

    Ok(())
}

/// Handle a panel button. Components that are not ours are ignored.
pub async fn handle_component(
    ctx: &serenity::Context,
    data: &Data,
    interaction: &serenity::ComponentInteraction,
) -> Result<(), Error> {
    let Some(request) = RenderRequest::parse(&interaction.data.custom_id) else {
        return Ok(());
    };

    if !member_has(interaction.member.as_ref(), request.required_permission()) {
        return respond_text(ctx, interaction, missing_permission_message()).await;
    }

    match request {
        RenderRequest::ViewHistory { subject } => {
            let content = match data.moderation.get_history(&subject.get().to_string()).await {
                Ok(history) => history_message(&history),
                Err(source) => failure_message(&source),
            };
            respond_text(ctx, interaction, &content).await
        }
        RenderRequest::OpenWarnForm { subject } => {
            open_reason_form(ctx, interaction, FormSubmission::Warn { subject }).await
        }
        RenderRequest::OpenBanForm { subject } => {
            open_reason_form(ctx, interaction, FormSubmission::Ban { subject }).await
        }
        RenderRequest::Close { .. } => {
            interaction
                .create_response(
                    ctx,
                    serenity::CreateInteractionResponse::UpdateMessage(
                        serenity::CreateInteractionResponseMessage::new()
                            .content("Panel closed.")
                            .embeds(Vec::new())
                            .components(Vec::new()),
                    ),
                )
                .await?;
            Ok(())
        }
    }
}

/// Handle a submitted warn or ban form. Modals that are not ours are ignored.
pub async fn handle_modal(
    ctx: &serenity::Context,
    data: &Data,
    interaction: &serenity::ModalInteraction,
) -> Result<(), Error> {
    let Some(submission) = FormSubmission::parse(&interaction.data.custom_id) else {
        return Ok(());
    };

    let Some(guild_id) = interaction.guild_id else {
        return respond_modal_text(ctx, interaction, guild_only_message()).await;
    };

    if !member_has(interaction.member.as_ref(), submission.required_permission()) {
        return respond_modal_text(ctx, interaction, missing_permission_message()).await;
    }

    let reason = modal_text_value(&interaction.data.components, REASON_INPUT_ID)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "No reason provided".to_owned());
    let moderator = moderator_label(&interaction.user);

    match submission {
        FormSubmission::Warn { subject } => {
            interaction.defer_ephemeral(ctx).await?;

            let content =
                match warn_member(&ctx.http, data, guild_id, subject, &moderator, &reason).await {
                    Ok((outcome, enforcement)) => {
                        warning_reply(subject, &reason, &outcome, enforcement)
                    }
                    Err(source) => failure_message(&source),
                };
            followup_text(ctx, interaction, &content).await
        }
        FormSubmission::Ban { subject } => {
            if subject == interaction.user.id {
                return respond_modal_text(ctx, interaction, "You can't ban yourself.").await;
            }

            // The ban notice and the ban itself can outlast the response window.
            interaction.defer_ephemeral(ctx).await?;

            let content = match ctx.http.get_user(subject).await {
                Ok(target) => {
                    match ban_member(&ctx.http, data, guild_id, &target, &moderator, &reason).await
                    {
                        Ok((_, enforcement)) => ban_reply(subject, &reason, enforcement),
                        Err(source) => failure_message(&source),
                    }
                }
                Err(source) => {
                    error!(?source, user_id = subject.get(), "failed to resolve ban target");
                    "I couldn't find that user.".to_owned()
                }
            };

            followup_text(ctx, interaction, &content).await
        }
    }
}

async fn open_reason_form(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    submission: FormSubmission,
) -> Result<(), Error> {
    let modal = serenity::CreateModal::new(submission.custom_id(), submission.title()).components(
        vec![serenity::CreateActionRow::InputText(
            serenity::CreateInputText::new(
                serenity::InputTextStyle::Paragraph,
                "Reason",
                REASON_INPUT_ID,
            )
            .placeholder("Why is this action being taken?")
            .max_length(MAX_REASON_CHARS as u16)
            .required(true),
        )],
    );

    interaction
        .create_response(ctx, serenity::CreateInteractionResponse::Modal(modal))
        .await?;
    Ok(())
}

async fn respond_text(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    content: &str,
) -> Result<(), Error> {
    interaction
        .create_response(
            ctx,
            serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new()
                    .content(content)
                    .ephemeral(true)
                    .allowed_mentions(serenity::CreateAllowedMentions::new()),
            ),
        )
        .await?;
    Ok(())
}

async fn respond_modal_text(
    ctx: &serenity::Context,
    interaction: &serenity::ModalInteraction,
    content: &str,
) -> Result<(), Error> {
    interaction
        .create_response(
            ctx,
            serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new()
                    .content(content)
                    .ephemeral(true)
                    .allowed_mentions(serenity::CreateAllowedMentions::new()),
            ),
        )
        .await?;
    Ok(())
}

/// Answer a modal that was already deferred.
async fn followup_text(
    ctx: &serenity::Context,
    interaction: &serenity::ModalInteraction,
    content: &str,
) -> Result<(), Error> {
    interaction
        .create_followup(
            ctx,
            serenity::CreateInteractionResponseFollowup::new()
                .content(content)
                .ephemeral(true)
                .allowed_mentions(serenity::CreateAllowedMentions::new()),
        )
        .await?;
    Ok(())
}

fn member_has(member: Option<&serenity::Member>, required: serenity::Permissions) -> bool {
    has_permission(member.and_then(|member| member.permissions), required)
}

fn has_permission(granted: Option<serenity::Permissions>, required: serenity::Permissions) -> bool {
    granted.is_some_and(|permissions| {
        permissions.contains(serenity::Permissions::ADMINISTRATOR) || permissions.contains(required)
    })
}

fn modal_text_value(rows: &[serenity::ActionRow], input_id: &str) -> Option<String> {
    rows.iter()
        .flat_map(|row| row.components.iter())
        .find_map(|component| match component {
            serenity::ActionRowComponent::InputText(input) if input.custom_id == input_id => {
                input.value.clone()
            }
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude as serenity;

    use super::has_permission;

    #[test]
    fn permission_check_requires_resolved_permissions() {
        let required = serenity::Permissions::BAN_MEMBERS;

        assert!(!has_permission(None, required));
        assert!(!has_permission(Some(serenity::Permissions::MODERATE_MEMBERS), required));
        assert!(has_permission(Some(serenity::Permissions::BAN_MEMBERS), required));
        assert!(has_permission(Some(serenity::Permissions::ADMINISTRATOR), required));
    }
}

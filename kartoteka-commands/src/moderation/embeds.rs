use poise::serenity_prelude as serenity;
use tracing::error;

use kartoteka_core::{ModerationError, Profile};
use kartoteka_utils::embed::{DEFAULT_EMBED_COLOR, field_embed};
use kartoteka_utils::formatting::escape_mentions;

use crate::moderation::render::RenderRequest;

pub fn display_name(user: &serenity::User) -> String {
    user.global_name.clone().unwrap_or_else(|| user.name.clone())
}

/// Identifier recorded as the moderator of a manual action.
pub fn moderator_label(user: &serenity::User) -> String {
    user.name.clone()
}

pub fn profile_embed(user: &serenity::User, profile: Profile) -> serenity::CreateEmbed {
    let face = user.face();
    field_embed(
        &format!("Kartoteka: {}", display_name(user)),
        Some(&face),
        vec![
            ("User".to_owned(), format!("<@{}>", user.id.get()), true),
            ("ID".to_owned(), user.id.get().to_string(), true),
            ("\u{200B}".to_owned(), "\u{200B}".to_owned(), true),
            ("Warns".to_owned(), profile.warn_count.to_string(), true),
            ("Mutes".to_owned(), profile.mute_count.to_string(), true),
            ("Bans".to_owned(), profile.ban_count.to_string(), true),
        ],
    )
}

pub fn panel_buttons(subject: serenity::UserId) -> Vec<serenity::CreateActionRow> {
    vec![serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(RenderRequest::ViewHistory { subject }.custom_id())
            .label("History")
            .style(serenity::ButtonStyle::Primary),
        serenity::CreateButton::new(RenderRequest::OpenWarnForm { subject }.custom_id())
            .label("Warn")
            .style(serenity::ButtonStyle::Secondary),
        serenity::CreateButton::new(RenderRequest::OpenBanForm { subject }.custom_id())
            .label("Ban")
            .style(serenity::ButtonStyle::Danger),
        serenity::CreateButton::new(RenderRequest::Close { subject }.custom_id())
            .label("Close")
            .style(serenity::ButtonStyle::Secondary),
    ])]
}

pub fn ban_notice_embed(guild_name: &str, reason: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .title(format!("You have been banned from {guild_name}"))
        .description(format!("**Reason :** {}", escape_mentions(reason)))
}

pub fn guild_only_message() -> &'static str {
    "This command only works in servers."
}

pub fn missing_permission_message() -> &'static str {
    "You don't have permission to do that."
}

/// Reply text for a failed core call. Storage details stay in the logs.
pub fn failure_message(source: &ModerationError) -> String {
    match source {
        ModerationError::InvalidArgument(message) => {
            format!("Invalid input: {}", escape_mentions(message))
        }
        ModerationError::NotFound(message) => format!("Not found: {}", escape_mentions(message)),
        ModerationError::Storage(_) => {
            error!(?source, "moderation storage call failed");
            "The moderation log is unavailable right now. Please try again.".to_owned()
        }
    }
}

pub fn is_missing_permissions_error(source: &serenity::Error) -> bool {
    matches!(
        source,
        serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 403 || response.error.code == 50013
    )
}

#[cfg(test)]
mod tests {
    use kartoteka_core::ModerationError;

    use super::failure_message;

    #[test]
    fn invalid_input_is_explained() {
        let message = failure_message(&ModerationError::invalid("reason is too long"));
        assert_eq!(message, "Invalid input: reason is too long");
    }

    #[test]
    fn storage_details_are_not_shown() {
        let source = ModerationError::Storage(anyhow::anyhow!("disk I/O error at /var/db"));
        let message = failure_message(&source);
        assert!(!message.contains("/var/db"));
    }
}

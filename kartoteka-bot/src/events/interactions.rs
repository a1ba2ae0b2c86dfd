use poise::serenity_prelude as serenity;

use kartoteka_commands::moderation::{handle_component, handle_modal};
use kartoteka_commands::{Data, Error};

/// Route profile panel buttons and forms. Slash commands are left to poise.
pub async fn handle_interaction(
    ctx: &serenity::Context,
    data: &Data,
    interaction: &serenity::Interaction,
) -> Result<(), Error> {
    match interaction {
        serenity::Interaction::Component(component) => {
            handle_component(ctx, data, component).await
        }
        serenity::Interaction::Modal(modal) => handle_modal(ctx, data, modal).await,
        _ => Ok(()),
    }
}

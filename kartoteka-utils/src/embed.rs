use poise::serenity_prelude as serenity;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x34_98_DB;

/// A titled embed made of `(name, value, inline)` fields.
pub fn field_embed(
    title: &str,
    thumbnail_url: Option<&str>,
    fields: Vec<(String, String, bool)>,
) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .title(title.to_owned())
        .color(DEFAULT_EMBED_COLOR)
        .fields(fields);

    if let Some(url) = thumbnail_url {
        embed = embed.thumbnail(url);
    }

    embed
}

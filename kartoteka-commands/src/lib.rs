pub mod moderation;

use kartoteka_core::ModerationService;

/// Shared state handed to every command and interaction handler.
pub struct Data {
    pub moderation: ModerationService,
}

pub type Error = anyhow::Error;
pub type Context<'a> = poise::Context<'a, Data, Error>;

pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    moderation::panel::META,
    moderation::warn::META,
    moderation::mute::META,
    moderation::ban::META,
];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        moderation::panel::kartoteka(),
        moderation::warn::warn(),
        moderation::mute::mute(),
        moderation::ban::ban(),
    ]
}

#[cfg(test)]
mod tests {
    use super::{COMMANDS, commands};

    #[test]
    fn every_command_has_metadata() {
        let registered: Vec<String> = commands().into_iter().map(|command| command.name).collect();
        let described: Vec<&str> = COMMANDS.iter().map(|meta| meta.name).collect();

        assert_eq!(registered.len(), described.len());
        for name in described {
            assert!(registered.iter().any(|registered| registered == name), "{name}");
        }
    }
}

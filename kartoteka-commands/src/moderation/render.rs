//! Custom ids for the profile panel's buttons and forms.
//!
//! Ids look like `kartoteka:<kind>:<user id>` so a click still resolves to the
//! right subject after a restart, without any per-message state.

use poise::serenity_prelude as serenity;

const PREFIX: &str = "kartoteka";

/// Text input id inside the warn and ban forms.
pub const REASON_INPUT_ID: &str = "reason";

/// A button press on the profile panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderRequest {
    ViewHistory { subject: serenity::UserId },
    OpenWarnForm { subject: serenity::UserId },
    OpenBanForm { subject: serenity::UserId },
    Close { subject: serenity::UserId },
}

impl RenderRequest {
    pub fn custom_id(self) -> String {
        let (kind, subject) = match self {
            Self::ViewHistory { subject } => ("history", subject),
            Self::OpenWarnForm { subject } => ("warn", subject),
            Self::OpenBanForm { subject } => ("ban", subject),
            Self::Close { subject } => ("close", subject),
        };
        format_id(kind, subject)
    }

    /// `None` for ids that belong to some other component.
    pub fn parse(custom_id: &str) -> Option<Self> {
        let (kind, subject) = split_id(custom_id)?;
        match kind {
            "history" => Some(Self::ViewHistory { subject }),
            "warn" => Some(Self::OpenWarnForm { subject }),
            "ban" => Some(Self::OpenBanForm { subject }),
            "close" => Some(Self::Close { subject }),
            _ => None,
        }
    }

    /// Permission the clicking member needs.
    pub fn required_permission(self) -> serenity::Permissions {
        match self {
            Self::OpenBanForm { .. } => serenity::Permissions::BAN_MEMBERS,
            _ => serenity::Permissions::MODERATE_MEMBERS,
        }
    }
}

/// A submitted warn or ban form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormSubmission {
    Warn { subject: serenity::UserId },
    Ban { subject: serenity::UserId },
}

impl FormSubmission {
    pub fn custom_id(self) -> String {
        match self {
            Self::Warn { subject } => format_id("warn_form", subject),
            Self::Ban { subject } => format_id("ban_form", subject),
        }
    }

    pub fn parse(custom_id: &str) -> Option<Self> {
        let (kind, subject) = split_id(custom_id)?;
        match kind {
            "warn_form" => Some(Self::Warn { subject }),
            "ban_form" => Some(Self::Ban { subject }),
            _ => None,
        }
    }

    pub fn required_permission(self) -> serenity::Permissions {
        match self {
            Self::Warn { .. } => serenity::Permissions::MODERATE_MEMBERS,
            Self::Ban { .. } => serenity::Permissions::BAN_MEMBERS,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Warn { .. } => "Warn member",
            Self::Ban { .. } => "Ban member",
        }
    }
}

fn format_id(kind: &str, subject: serenity::UserId) -> String {
    format!("{PREFIX}:{kind}:{}", subject.get())
}

fn split_id(custom_id: &str) -> Option<(&str, serenity::UserId)> {
    let rest = custom_id.strip_prefix(PREFIX)?.strip_prefix(':')?;
    let (kind, raw_subject) = rest.split_once(':')?;
    let subject = raw_subject.parse::<u64>().ok().filter(|id| *id != 0)?;
    Some((kind, serenity::UserId::new(subject)))
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude as serenity;

    use super::{FormSubmission, RenderRequest};

    #[test]
    fn button_ids_resolve_back_to_requests() {
        let subject = serenity::UserId::new(81_234_567_890);
        for request in [
            RenderRequest::ViewHistory { subject },
            RenderRequest::OpenWarnForm { subject },
            RenderRequest::OpenBanForm { subject },
            RenderRequest::Close { subject },
        ] {
            let id = request.custom_id();
            assert!(id.len() <= 100, "component ids are capped at 100 chars");
            assert_eq!(RenderRequest::parse(&id), Some(request));
        }
    }

    #[test]
    fn form_ids_are_distinct_from_button_ids() {
        let subject = serenity::UserId::new(42);
        let warn_form = FormSubmission::Warn { subject }.custom_id();

        assert_eq!(warn_form, "kartoteka:warn_form:42");
        assert_eq!(RenderRequest::parse(&warn_form), None);
        assert_eq!(
            FormSubmission::parse(&warn_form),
            Some(FormSubmission::Warn { subject })
        );
        assert_eq!(FormSubmission::parse("kartoteka:warn:42"), None);
    }

    #[test]
    fn foreign_and_malformed_ids_are_ignored() {
        for id in [
            "",
            "confirm",
            "kartoteka",
            "kartoteka:history",
            "kartoteka:history:",
            "kartoteka:history:abc",
            "kartoteka:history:0",
            "kartoteka:unknown:42",
            "other:history:42",
            "kartotekahistory:42",
        ] {
            assert_eq!(RenderRequest::parse(id), None, "{id}");
            assert_eq!(FormSubmission::parse(id), None, "{id}");
        }
    }

    #[test]
    fn ban_actions_need_ban_permission() {
        let subject = serenity::UserId::new(7);
        assert_eq!(
            RenderRequest::OpenBanForm { subject }.required_permission(),
            serenity::Permissions::BAN_MEMBERS
        );
        assert_eq!(
            RenderRequest::ViewHistory { subject }.required_permission(),
            serenity::Permissions::MODERATE_MEMBERS
        );
        assert_eq!(
            FormSubmission::Ban { subject }.required_permission(),
            serenity::Permissions::BAN_MEMBERS
        );
    }
}

//! Input checks applied before anything is written.

use crate::error::{ModerationError, ModerationResult};

pub const MAX_SUBJECT_ID_LEN: usize = 64;
pub const MAX_REASON_CHARS: usize = 1024;

pub fn subject_id(raw: &str) -> ModerationResult<()> {
    if raw.trim().is_empty() {
        return Err(ModerationError::invalid("subject id must not be empty"));
    }
    if raw.len() > MAX_SUBJECT_ID_LEN {
        return Err(ModerationError::invalid(format!(
            "subject id longer than {MAX_SUBJECT_ID_LEN} bytes"
        )));
    }
    if raw.chars().any(|ch| ch.is_whitespace() || ch.is_control()) {
        return Err(ModerationError::invalid(format!(
            "subject id `{}` contains whitespace or control characters",
            raw.escape_debug()
        )));
    }
    Ok(())
}

pub fn moderator_id(raw: &str) -> ModerationResult<()> {
    if raw.trim().is_empty() {
        return Err(ModerationError::invalid("moderator id must not be empty"));
    }
    Ok(())
}

pub fn reason(raw: &str) -> ModerationResult<()> {
    if raw.chars().count() > MAX_REASON_CHARS {
        return Err(ModerationError::invalid(format!(
            "reason longer than {MAX_REASON_CHARS} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_ids() {
        assert!(subject_id("123456789012345678").is_ok());
        assert!(subject_id("member-a").is_ok());
        assert!(subject_id("").is_err());
        assert!(subject_id("   ").is_err());
        assert!(subject_id("12 34").is_err());
        assert!(subject_id("12\n").is_err());
        assert!(subject_id(&"9".repeat(MAX_SUBJECT_ID_LEN)).is_ok());
        assert!(subject_id(&"9".repeat(MAX_SUBJECT_ID_LEN + 1)).is_err());
    }

    #[test]
    fn moderator_ids_and_reasons() {
        assert!(moderator_id("mod1").is_ok());
        assert!(moderator_id(" ").is_err());
        assert!(reason("").is_ok());
        assert!(reason(&"ą".repeat(MAX_REASON_CHARS)).is_ok());
        assert!(reason(&"a".repeat(MAX_REASON_CHARS + 1)).is_err());
    }
}

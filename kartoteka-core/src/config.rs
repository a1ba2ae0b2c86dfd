use std::env;
use std::time::Duration;

pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunables for the moderation service.
#[derive(Clone, Debug)]
pub struct ModerationConfig {
    /// Upper bound on any single storage call made by the service.
    pub storage_timeout: Duration,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            storage_timeout: DEFAULT_STORAGE_TIMEOUT,
        }
    }
}

impl ModerationConfig {
    /// Read `STORAGE_TIMEOUT_MS`, falling back to the default.
    pub fn from_env() -> Self {
        let timeout_ms = env_u64(
            "STORAGE_TIMEOUT_MS",
            u64::try_from(DEFAULT_STORAGE_TIMEOUT.as_millis()).unwrap_or(5_000),
        );

        Self {
            storage_timeout: Duration::from_millis(timeout_ms.max(1)),
        }
    }
}

pub fn env_bool(key: &str, default: bool) -> bool {
    parse_bool(env::var(key).ok().as_deref(), default)
}

pub fn env_u64(key: &str, default: u64) -> u64 {
    parse_u64(env::var(key).ok().as_deref(), default)
}

fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value {
        Some(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        None => default,
    }
}

fn parse_u64(value: Option<&str>, default: u64) -> u64 {
    value
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_values() {
        assert!(parse_bool(Some(" Yes "), false));
        assert!(parse_bool(Some("1"), false));
        assert!(!parse_bool(Some("off"), true));
        assert!(parse_bool(None, true));
    }

    #[test]
    fn u64_values_fall_back_on_garbage() {
        assert_eq!(parse_u64(Some("250"), 5_000), 250);
        assert_eq!(parse_u64(Some("-3"), 5_000), 5_000);
        assert_eq!(parse_u64(None, 7), 7);
    }

    #[test]
    fn default_timeout_is_bounded() {
        assert_eq!(ModerationConfig::default().storage_timeout, Duration::from_secs(5));
    }
}

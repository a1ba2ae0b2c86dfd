/// Generic embed builders shared across commands.
pub mod embed;
/// Shared formatting helpers (action names, durations, message budgets).
pub mod formatting;

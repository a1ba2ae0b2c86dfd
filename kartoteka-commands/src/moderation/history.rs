use kartoteka_core::Action;
use kartoteka_utils::formatting::{action_label, fit_lines};

/// Discord's message content limit.
pub const MESSAGE_LIMIT: usize = 2000;

const FENCE: &str = "```";

pub fn history_line(action: &Action) -> String {
    format!(
        "[{}] {} - {}: {}",
        action.timestamp.format("%Y-%m-%d %H:%M:%S"),
        action_label(action.action_type.as_str()),
        defuse_fence(&action.moderator_id),
        defuse_fence(&action.reason),
    )
}

/// Render a history (newest first) as one code block that fits a message.
pub fn history_message(actions: &[Action]) -> String {
    if actions.is_empty() {
        return "No history.".to_owned();
    }

    let lines: Vec<String> = actions.iter().map(history_line).collect();
    let budget = MESSAGE_LIMIT - (FENCE.len() * 2 + 2);
    format!("{FENCE}\n{}\n{FENCE}", fit_lines(&lines, budget))
}

// Keeps user text from closing the surrounding code block.
fn defuse_fence(text: &str) -> String {
    text.replace(FENCE, "`\u{200B}``").replace('\n', " ")
}

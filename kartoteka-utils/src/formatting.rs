/// Convert an action log type (`warn`, `mute`, `ban`) to its history label.
pub fn action_label(action_type: &str) -> String {
    let normalized = action_type.trim();
    if normalized.is_empty() {
        return "UNKNOWN".to_owned();
    }
    normalized.to_ascii_uppercase()
}

/// Break user mentions so echoed text cannot ping anyone.
pub fn escape_mentions(text: &str) -> String {
    text.replace('@', "@\u{200B}")
}

/// Cut `text` to at most `max_chars` characters, ending with `...` when shortened.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let keep = max_chars.saturating_sub(3);
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str("...");
    truncated
}

/// Format seconds into a compact human-readable duration (e.g. 59s, 1m, 1h, 1d, 1h 30m).
pub fn format_compact_duration(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        return if hours > 0 {
            format!("{}d {}h", days, hours)
        } else {
            format!("{}d", days)
        };
    }

    if hours > 0 {
        return if minutes > 0 {
            format!("{}h {}m", hours, minutes)
        } else {
            format!("{}h", hours)
        };
    }

    if minutes > 0 {
        return if seconds > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}m", minutes)
        };
    }

    format!("{}s", seconds)
}

/// Join whole lines until `max_chars` would be exceeded.
///
/// Dropped lines are summarised in a trailing `... and N more` line that is
/// itself counted against the budget.
pub fn fit_lines(lines: &[String], max_chars: usize) -> String {
    let total_chars: usize = lines.iter().map(|line| line.chars().count() + 1).sum();
    if total_chars.saturating_sub(1) <= max_chars {
        return lines.join("\n");
    }

    let mut kept: Vec<&str> = Vec::new();
    let mut used = 0;
    for (index, line) in lines.iter().enumerate() {
        let remaining = lines.len() - index - 1;
        let footer_chars = format!("... and {} more", remaining).chars().count() + 1;
        let line_chars = line.chars().count() + usize::from(!kept.is_empty());

        if used + line_chars + footer_chars > max_chars {
            break;
        }
        kept.push(line);
        used += line_chars;
    }

    let omitted = lines.len() - kept.len();
    let mut output = kept.join("\n");
    if !output.is_empty() {
        output.push('\n');
    }
    output.push_str(&format!("... and {} more", omitted));
    output
}

//! Canonical audit log events.
//!
//! Every routing decision and every agent invocation logs through these
//! helpers so the field set stays identical across the workflow.

use std::time::Duration;
use tracing::info;

/// Maximum characters kept in a logged query preview
pub const PREVIEW_CHARS: usize = 100;

/// First [`PREVIEW_CHARS`] characters of `text`, cut on a char boundary.
#[must_use]
pub fn preview(text: &str) -> &str {
    truncate_chars(text, PREVIEW_CHARS)
}

/// First `max_chars` characters of `text`.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// "Agent decision made"
pub fn log_agent_decision(conversation_id: &str, user_id: &str, decision: &str, query: &str) {
    info!(
        conversation_id,
        user_id,
        decision,
        query_preview = preview(query),
        "Agent decision made"
    );
}

/// "Agent processing completed"
pub fn log_agent_processing(
    agent: &str,
    conversation_id: &str,
    user_id: &str,
    processed_content: &str,
    elapsed: Duration,
    query: &str,
) {
    info!(
        agent,
        conversation_id,
        user_id,
        processed_content = preview(processed_content),
        execution_time_ms = elapsed.as_millis() as u64,
        query_preview = preview(query),
        "Agent processing completed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("What is 2 + 2?"), "What is 2 + 2?");
    }

    #[test]
    fn test_preview_counts_chars_not_bytes() {
        let text = "ç".repeat(150);
        let cut = preview(&text);
        assert_eq!(cut.chars().count(), PREVIEW_CHARS);
        assert_eq!(truncate_chars("não", 2), "nã");
    }
}

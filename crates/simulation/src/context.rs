//! Conversation context for a round.

use crate::provider::ChannelMessage;

/// Build the context shown to bots in a round.
///
/// `newest_first` is the channel history as fetched. Only bot posts are kept;
/// the alert and system messages are dropped by origin. The last `window`
/// of those are joined oldest first, separated by blank lines.
pub fn build_context(newest_first: &[ChannelMessage], window: usize) -> String {
    let bot_posts: Vec<&str> = newest_first
        .iter()
        .filter(|m| m.origin.is_bot())
        .take(window)
        .map(|m| m.text.as_str())
        .collect();

    bot_posts.into_iter().rev().collect::<Vec<_>>().join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use townsim_types::{MessageId, MessageOrigin};

    fn message(id: u32, text: &str, origin: MessageOrigin) -> ChannelMessage {
        ChannelMessage {
            id: MessageId::new(id.to_string()),
            text: text.to_string(),
            origin,
        }
    }

    fn history_oldest_first() -> Vec<ChannelMessage> {
        vec![
            message(1, "**EMERGENCY ALERT**", MessageOrigin::Alert),
            message(2, "**Ann**\nfirst", MessageOrigin::bot("Ann")),
            message(3, "**Bob**\nsecond", MessageOrigin::bot("Bob")),
            message(4, "status update", MessageOrigin::System),
            message(5, "**Cat**\nthird", MessageOrigin::bot("Cat")),
        ]
    }

    #[test]
    fn test_excludes_non_bot_messages() {
        let mut history = history_oldest_first();
        history.reverse();

        let context = build_context(&history, 10);
        assert_eq!(context, "**Ann**\nfirst\n\n**Bob**\nsecond\n\n**Cat**\nthird");
        assert!(!context.contains("EMERGENCY"));
    }

    #[test]
    fn test_window_keeps_latest_oldest_first() {
        let mut history = history_oldest_first();
        history.reverse();

        assert_eq!(
            build_context(&history, 2),
            "**Bob**\nsecond\n\n**Cat**\nthird"
        );
        assert_eq!(build_context(&history, 0), "");
    }

    #[test]
    fn test_bot_text_without_markers_is_kept() {
        // Plain bot text is still a bot message.
        let history = vec![message(1, "just words", MessageOrigin::bot("Dee"))];
        assert_eq!(build_context(&history, 10), "just words");
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(build_context(&[], 10), "");
    }
}

//! Screening of user-supplied emergency messages.
//!
//! The message is posted verbatim into every location channel and embedded
//! in every prompt, so markup and injection-looking text is refused up front.
//! Matching is case-insensitive substring search; every problem found is
//! reported, not only the first.

use thiserror::Error;

/// Longest accepted message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 500;

const EVENT_HANDLERS: &[&str] = &[
    "onclick",
    "onerror",
    "onload",
    "onmouseover",
    "onfocus",
    "onblur",
];

const EMBEDDING_TAGS: &[&str] = &["<iframe", "<embed", "<object"];

const SQL_PATTERNS: &[&str] = &[
    "drop table",
    "delete from",
    "insert into",
    "update set",
    "1=1",
    "1'='1",
];

/// One reason a message was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MessageProblem {
    #[error("Message is empty")]
    Empty,

    #[error("Message is longer than {} characters", MAX_MESSAGE_CHARS)]
    TooLong,

    #[error("Message contains script tags")]
    ScriptTag,

    #[error("Message contains event handlers")]
    EventHandler,

    #[error("Message contains javascript protocol")]
    JavascriptUrl,

    #[error("Message contains potentially malicious HTML tags")]
    EmbeddingTag,

    #[error("Message contains SQL-like injection patterns")]
    SqlPattern,
}

/// A refused message with every problem found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Emergency message rejected: {}", describe(.problems))]
pub struct MessageRejected {
    pub problems: Vec<MessageProblem>,
}

fn describe(problems: &[MessageProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Every problem with `message`, in a fixed order. Empty when acceptable.
pub fn message_problems(message: &str) -> Vec<MessageProblem> {
    let mut problems = Vec::new();

    if message.trim().is_empty() {
        problems.push(MessageProblem::Empty);
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        problems.push(MessageProblem::TooLong);
    }

    let lower = message.to_lowercase();
    let contains_any = |patterns: &[&str]| patterns.iter().any(|p| lower.contains(p));

    if lower.contains("<script") || lower.contains("</script>") {
        problems.push(MessageProblem::ScriptTag);
    }
    if contains_any(EVENT_HANDLERS) {
        problems.push(MessageProblem::EventHandler);
    }
    if lower.contains("javascript:") {
        problems.push(MessageProblem::JavascriptUrl);
    }
    if contains_any(EMBEDDING_TAGS) {
        problems.push(MessageProblem::EmbeddingTag);
    }
    if contains_any(SQL_PATTERNS) {
        problems.push(MessageProblem::SqlPattern);
    }

    problems
}

/// Accept `message` or report why not.
pub fn validate_emergency_message(message: &str) -> Result<(), MessageRejected> {
    let problems = message_problems(message);
    if problems.is_empty() {
        Ok(())
    } else {
        Err(MessageRejected { problems })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_message_accepted() {
        assert!(validate_emergency_message(
            "Hurricane Category 4 approaching coast. Mandatory evacuation in effect."
        )
        .is_ok());
    }

    #[test]
    fn test_reports_every_problem() {
        let err = validate_emergency_message(
            "<SCRIPT>alert(1)</script><img onError=x> javascript:void(0); DROP TABLE towns",
        )
        .unwrap_err();

        assert_eq!(
            err.problems,
            vec![
                MessageProblem::ScriptTag,
                MessageProblem::EventHandler,
                MessageProblem::JavascriptUrl,
                MessageProblem::SqlPattern,
            ]
        );
        assert!(err
            .to_string()
            .starts_with("Emergency message rejected: Message contains script tags; "));
    }

    #[test]
    fn test_embedding_tags() {
        for message in ["<iframe src=x>", "<embed src=x>", "<Object data=x>"] {
            assert_eq!(message_problems(message), vec![MessageProblem::EmbeddingTag]);
        }
    }

    #[test]
    fn test_sql_tautologies() {
        assert_eq!(message_problems("where 1=1"), vec![MessageProblem::SqlPattern]);
        assert_eq!(message_problems("or 1'='1"), vec![MessageProblem::SqlPattern]);
    }

    #[test]
    fn test_length_bounds() {
        assert_eq!(message_problems("   "), vec![MessageProblem::Empty]);
        assert!(message_problems(&"🌊".repeat(MAX_MESSAGE_CHARS)).is_empty());
        assert_eq!(
            message_problems(&"a".repeat(MAX_MESSAGE_CHARS + 1)),
            vec![MessageProblem::TooLong]
        );
    }
}

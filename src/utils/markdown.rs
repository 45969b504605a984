//! Escaping for Telegram MarkdownV2 messages.

/// Characters with special meaning in MarkdownV2.
const SPECIAL_CHARS: &[char] = &[
    '\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Escapes every MarkdownV2 special character so `text` is shown literally.
///
/// # Example
/// ```
/// use queue_bot::utils::markdown::escape_markdown;
///
/// assert_eq!(escape_markdown("Lab #3 (final)"), "Lab \\#3 \\(final\\)");
/// ```
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL_CHARS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_event_names() {
        assert_eq!(escape_markdown("Physics lab_2"), "Physics lab\\_2");
        assert_eq!(escape_markdown("C++ exam"), "C\\+\\+ exam");
        assert_eq!(escape_markdown("Q&A"), "Q&A");
    }

    #[test]
    fn test_escape_punctuation() {
        assert_eq!(escape_markdown("Position 3 is taken (Bob)."), "Position 3 is taken \\(Bob\\)\\.");
        assert_eq!(escape_markdown("1-30!"), "1\\-30\\!");
        assert_eq!(escape_markdown("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_escape_plain_text() {
        assert_eq!(escape_markdown(""), "");
        assert_eq!(escape_markdown("Queue is empty"), "Queue is empty");
    }
}

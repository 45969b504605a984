//! Plain-text message bodies for the bot.

use crate::database::models::{Event, QueueEntry};

pub const CHOOSE_EVENT: &str = "Choose an event:";

/// Free positions listed in the join prompt before the rest is summarized.
const AVAILABLE_PREVIEW: usize = 15;

pub fn start_text(is_admin: bool) -> String {
    let admin_note = if is_admin { " (you are the admin)" } else { "" };
    let mut text = format!("Queue bot for signing up to events.{admin_note}\n\nCommands:\n");
    text.push_str("/events — list events\n");
    text.push_str("/myid — show your Telegram ID\n");
    text.push_str("/dashboard — link to the dashboard\n");
    if is_admin {
        text.push_str("/add_event — create an event\n");
    }
    text.push_str("/cancel — abort the current step\n");
    text.push_str("/help — show all commands\n");
    text
}

pub fn event_card(event: &Event, taken: usize) -> String {
    format!("📌 {}\nTaken: {}/{}", event.name, taken, event.max_positions)
}

pub fn queue_listing(event: &Event, queue: &[QueueEntry]) -> String {
    if queue.is_empty() {
        return format!("📋 {}\n\nQueue is empty", event.name);
    }

    let mut lines = vec![format!("📋 {}\n", event.name)];
    lines.extend(
        queue
            .iter()
            .map(|entry| format!("{}. {}", entry.position, entry.display_name())),
    );
    lines.join("\n")
}

/// First free positions, with a count of the ones left out.
pub fn summarize_positions(available: &[i64]) -> String {
    let shown = available
        .iter()
        .take(AVAILABLE_PREVIEW)
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    if available.len() > AVAILABLE_PREVIEW {
        format!("{shown}... ({} more)", available.len() - AVAILABLE_PREVIEW)
    } else {
        shown
    }
}

/// Prompt for the join dialogue. `available` must not be empty.
pub fn position_prompt(max_positions: i64, available: &[i64]) -> String {
    let nearest = available.first().copied().unwrap_or(1);
    format!(
        "Enter a position number (1-{max_positions})\n\nNearest free: {nearest}\nFree: {}",
        summarize_positions(available)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> Event {
        Event {
            id: 1,
            name: "Lab 1".to_string(),
            max_positions: 30,
            created_at: String::new(),
        }
    }

    fn entry(position: i64, first_name: Option<&str>) -> QueueEntry {
        QueueEntry {
            event_id: 1,
            position,
            user_id: position * 100,
            username: None,
            first_name: first_name.map(str::to_string),
            registered_at: String::new(),
        }
    }

    #[test]
    fn test_event_card() {
        assert_eq!(event_card(&event(), 4), "📌 Lab 1\nTaken: 4/30");
    }

    #[test]
    fn test_queue_listing_empty() {
        assert_eq!(queue_listing(&event(), &[]), "📋 Lab 1\n\nQueue is empty");
    }

    #[test]
    fn test_queue_listing_entries() {
        let text = queue_listing(&event(), &[entry(1, Some("Anna")), entry(3, None)]);
        assert_eq!(text, "📋 Lab 1\n\n1. Anna\n3. —");
    }

    #[test]
    fn test_summarize_positions_truncates() {
        let available: Vec<i64> = (1..=20).collect();
        assert_eq!(
            summarize_positions(&available),
            "1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15... (5 more)"
        );
        assert_eq!(summarize_positions(&[2, 5]), "2, 5");
    }

    #[test]
    fn test_position_prompt_names_nearest() {
        let prompt = position_prompt(10, &[3, 7]);
        assert!(prompt.starts_with("Enter a position number (1-10)"));
        assert!(prompt.contains("Nearest free: 3"));
        assert!(prompt.ends_with("Free: 3, 7"));
    }

    #[test]
    fn test_start_text_mentions_admin() {
        assert!(start_text(true).contains("(you are the admin)"));
        assert!(start_text(true).contains("/add_event"));
        assert!(!start_text(false).contains("/add_event"));
    }

    #[test]
    fn test_start_text_lists_every_public_command() {
        let text = start_text(false);
        for command in ["/events", "/myid", "/dashboard", "/cancel", "/help"] {
            assert!(text.contains(command), "missing {command}");
        }
    }
}

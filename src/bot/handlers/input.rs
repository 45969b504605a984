//! Handlers for free-text answers while a dialogue is waiting for input.

use teloxide::prelude::*;

use crate::bot::commands::add_event::max_positions_prompt;
use crate::bot::keyboards;
use crate::bot::state::{HandlerResult, QueueDialogue, State};
use crate::database::{connection::DatabaseManager, models::*};
use crate::utils::feedback::{CommandFeedback, FeedbackType};
use crate::utils::logging::{
    log_command_error, log_command_success, log_database_error, log_database_operation,
    log_validation_error, Actor,
};
use crate::utils::validation::{parse_max_positions, parse_position, validate_event_name};

/// Only the user who opened a dialogue step may answer it.
fn answers_step(sender: Option<u64>, owner: u64) -> bool {
    sender == Some(owner)
}

fn is_from(msg: &Message, owner: u64) -> bool {
    answers_step(msg.from().map(|u| u.id.0), owner)
}

/// What the capacity step does with an answer.
#[derive(Debug, PartialEq, Eq)]
enum CapacityAnswer {
    /// Create the event with this many positions.
    Accept(i64),
    /// Stay on the step and show the error.
    Reask(String),
}

fn read_capacity(raw: &str) -> CapacityAnswer {
    match parse_max_positions(raw) {
        Ok(max) => CapacityAnswer::Accept(max),
        Err(e) => CapacityAnswer::Reask(e.to_string()),
    }
}

async fn events_keyboard_or_empty(db: &DatabaseManager) -> teloxide::types::InlineKeyboardMarkup {
    match Event::find_all(&db.pool).await {
        Ok(events) => keyboards::events_keyboard(&events),
        Err(e) => {
            log_database_error("SELECT", "events", &e.to_string(), None);
            keyboards::events_keyboard(&[])
        }
    }
}

pub async fn receive_event_name(
    bot: Bot,
    msg: Message,
    dialogue: QueueDialogue,
    admin_id: u64,
) -> HandlerResult {
    if !is_from(&msg, admin_id) {
        return Ok(());
    }
    let actor = Actor::from_message(&msg);
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    let raw = msg.text().unwrap_or_default();
    match validate_event_name(raw) {
        Ok(name) => {
            dialogue
                .update(State::AwaitingMaxPositions { admin_id, name })
                .await?;
            bot.send_message(msg.chat.id, max_positions_prompt()).await?;
        }
        Err(e) => {
            log_validation_error("add_event", "name", raw, &e.to_string(), &actor);
            feedback
                .validation_error(&e.to_string(), "Type the event name, or /cancel to stop")
                .await?;
        }
    }
    Ok(())
}

pub async fn receive_max_positions(
    bot: Bot,
    msg: Message,
    dialogue: QueueDialogue,
    (admin_id, name): (u64, String),
    db: DatabaseManager,
) -> HandlerResult {
    if !is_from(&msg, admin_id) {
        return Ok(());
    }
    let actor = Actor::from_message(&msg);
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    let Some(raw) = msg.text() else {
        feedback.warning("Send the number of positions as text").await?;
        return Ok(());
    };

    let max_positions = match read_capacity(raw) {
        CapacityAnswer::Accept(max) => max,
        CapacityAnswer::Reask(error) => {
            log_validation_error("add_event", "max_positions", raw, &error, &actor);
            feedback
                .validation_error(&error, "Send a number up to 500, or any non-numeric answer for the default")
                .await?;
            return Ok(());
        }
    };

    log_database_operation("INSERT", "events", Some(&name));
    match Event::create(&db.pool, &name, max_positions).await {
        Ok(Some(event)) => {
            log_command_success("add_event", &actor, Some(&format!("event {} '{}'", event.id, event.name)));
            feedback
                .success(&format!(
                    "Event '{}' created (max. {} positions)",
                    event.name, event.max_positions
                ))
                .await?;
        }
        Ok(None) => {
            feedback
                .warning(&format!("Event '{name}' already exists"))
                .await?;
        }
        Err(e) => {
            log_database_error("INSERT", "events", &e.to_string(), Some(&name));
            log_command_error("add_event", &actor, &e.to_string());
            feedback.error("Failed to create the event").await?;
        }
    }

    dialogue.exit().await?;
    Ok(())
}

pub async fn receive_position(
    bot: Bot,
    msg: Message,
    dialogue: QueueDialogue,
    (event_id, user_id): (i64, u64),
    db: DatabaseManager,
) -> HandlerResult {
    if !is_from(&msg, user_id) {
        return Ok(());
    }
    let actor = Actor::from_message(&msg);
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    let position = match parse_position(msg.text().unwrap_or_default()) {
        Ok(position) => position,
        Err(e) => {
            feedback.warning(&e.to_string()).await?;
            return Ok(());
        }
    };

    let Some(db_id) = db_user_id(user_id) else {
        log_command_error("register", &actor, "user id out of range");
        feedback.error("Your account can't be queued").await?;
        dialogue.exit().await?;
        return Ok(());
    };

    let user = QueueUser {
        user_id: db_id,
        username: msg.from().and_then(|u| u.username.clone()),
        first_name: msg.from().map(|u| u.first_name.clone()),
    };

    log_database_operation("INSERT", "queue", Some(&format!("event {event_id} position {position}")));
    let outcome = match QueueEntry::register(&db.pool, event_id, position, &user).await {
        Ok(outcome) => outcome,
        Err(e) => {
            log_database_error("INSERT", "queue", &e.to_string(), Some(&format!("event {event_id}")));
            log_command_error("register", &actor, &e.to_string());
            feedback.error("Failed to save your registration").await?;
            dialogue.exit().await?;
            return Ok(());
        }
    };

    if outcome.is_registered() {
        log_command_success("register", &actor, Some(&format!("event {event_id} position {position}")));
    }

    let feedback_type = if outcome.is_registered() {
        FeedbackType::Success
    } else {
        FeedbackType::Warning
    };
    let keyboard = events_keyboard_or_empty(&db).await;
    feedback
        .send_with_keyboard(feedback_type, &outcome.message(), keyboard)
        .await?;

    dialogue.exit().await?;
    Ok(())
}

pub async fn receive_new_name(
    bot: Bot,
    msg: Message,
    dialogue: QueueDialogue,
    (event_id, admin_id): (i64, u64),
    db: DatabaseManager,
) -> HandlerResult {
    if !is_from(&msg, admin_id) {
        return Ok(());
    }
    let actor = Actor::from_message(&msg);
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    let raw = msg.text().unwrap_or_default();
    let name = match validate_event_name(raw) {
        Ok(name) => name,
        Err(e) => {
            log_validation_error("rename_event", "name", raw, &e.to_string(), &actor);
            feedback
                .validation_error(&e.to_string(), "Type the new name, or /cancel to stop")
                .await?;
            return Ok(());
        }
    };

    log_database_operation("UPDATE", "events", Some(&format!("event {event_id} -> '{name}'")));
    match Event::rename(&db.pool, event_id, &name).await {
        Ok(true) => {
            log_command_success("rename_event", &actor, Some(&name));
            let keyboard = events_keyboard_or_empty(&db).await;
            feedback
                .send_with_keyboard(FeedbackType::Success, &format!("Event renamed to '{name}'"), keyboard)
                .await?;
        }
        Ok(false) => {
            feedback
                .warning(&format!("Can't rename: '{name}' is already used or the event no longer exists"))
                .await?;
        }
        Err(e) => {
            log_database_error("UPDATE", "events", &e.to_string(), Some(&name));
            feedback.error("Failed to rename the event").await?;
        }
    }

    dialogue.exit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_step_owner_answers() {
        assert!(answers_step(Some(42), 42));
        assert!(!answers_step(Some(43), 42));
        assert!(!answers_step(None, 42));
    }

    #[test]
    fn test_capacity_defaults_on_non_numeric_answer() {
        assert_eq!(read_capacity("lots"), CapacityAnswer::Accept(DEFAULT_MAX_POSITIONS));
        assert_eq!(read_capacity("   "), CapacityAnswer::Accept(DEFAULT_MAX_POSITIONS));
        assert_eq!(read_capacity("12"), CapacityAnswer::Accept(12));
    }

    #[test]
    fn test_capacity_reasks_out_of_range() {
        assert!(matches!(read_capacity("0"), CapacityAnswer::Reask(_)));
        assert!(matches!(read_capacity("-5"), CapacityAnswer::Reask(_)));
        assert_eq!(
            read_capacity("501"),
            CapacityAnswer::Reask("Number of positions cannot exceed 500".to_string())
        );
    }
}

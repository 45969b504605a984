use std::sync::Arc;

use teloxide::prelude::*;

use crate::bot::state::HandlerResult;
use crate::bot::{keyboards, views};
use crate::config::Config;
use crate::database::{connection::DatabaseManager, models::*};
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_command_start, log_command_success, log_database_error, Actor};

pub async fn handle_events(
    bot: Bot,
    msg: Message,
    keyword: String,
    db: &DatabaseManager,
    config: &Arc<Config>,
) -> HandlerResult {
    let actor = Actor::from_message(&msg);
    let keyword = keyword.trim();
    log_command_start("events", &actor, (!keyword.is_empty()).then_some(keyword));

    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    if keyword.is_empty() {
        let events = match Event::find_all(&db.pool).await {
            Ok(events) => events,
            Err(e) => {
                log_database_error("SELECT", "events", &e.to_string(), None);
                feedback.error("Failed to load events").await?;
                return Ok(());
            }
        };

        bot.send_message(msg.chat.id, views::CHOOSE_EVENT)
            .reply_markup(keyboards::events_keyboard(&events))
            .await?;
        log_command_success("events", &actor, Some(&format!("{} events", events.len())));
        return Ok(());
    }

    let event = match Event::find_by_keyword(&db.pool, keyword).await {
        Ok(Some(event)) => event,
        Ok(None) => {
            feedback
                .validation_error(
                    &format!("No event matches '{keyword}'"),
                    "Use /events without a keyword to see all events",
                )
                .await?;
            return Ok(());
        }
        Err(e) => {
            log_database_error("SELECT", "events", &e.to_string(), Some(keyword));
            feedback.error("Failed to search events").await?;
            return Ok(());
        }
    };

    let taken = match QueueEntry::find_by_event(&db.pool, event.id).await {
        Ok(queue) => queue.len(),
        Err(e) => {
            log_database_error("SELECT", "queue", &e.to_string(), Some(&event.name));
            feedback.error("Failed to load the queue").await?;
            return Ok(());
        }
    };

    bot.send_message(msg.chat.id, views::event_card(&event, taken))
        .reply_markup(keyboards::event_actions_keyboard(
            event.id,
            config.is_admin(actor.user_id),
        ))
        .await?;

    log_command_success("events", &actor, Some(&event.name));
    Ok(())
}

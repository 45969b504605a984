use std::sync::Arc;

use teloxide::prelude::*;

use crate::bot::state::{HandlerResult, QueueDialogue, State};
use crate::config::Config;
use crate::database::models::DEFAULT_MAX_POSITIONS;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_access_denied, log_command_start, log_validation_error, Actor};
use crate::utils::validation::validate_event_name;

pub fn max_positions_prompt() -> String {
    format!("How many positions at most? (number, default {DEFAULT_MAX_POSITIONS})")
}

/// `/add_event [name]`. Without a name the dialogue asks for one first.
pub async fn handle_add_event(
    bot: Bot,
    msg: Message,
    name: String,
    dialogue: QueueDialogue,
    config: &Arc<Config>,
) -> HandlerResult {
    let actor = Actor::from_message(&msg);
    log_command_start("add_event", &actor, None);

    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    if !config.is_admin(actor.user_id) {
        log_access_denied("add_event", &actor);
        feedback.error("Only the admin can add events").await?;
        return Ok(());
    }

    if name.trim().is_empty() {
        dialogue
            .update(State::AwaitingEventName { admin_id: actor.user_id })
            .await?;
        bot.send_message(msg.chat.id, "Enter the event name:").await?;
        return Ok(());
    }

    match validate_event_name(&name) {
        Ok(name) => {
            dialogue
                .update(State::AwaitingMaxPositions { admin_id: actor.user_id, name })
                .await?;
            bot.send_message(msg.chat.id, max_positions_prompt()).await?;
        }
        Err(e) => {
            log_validation_error("add_event", "name", &name, &e.to_string(), &actor);
            feedback
                .validation_error(&e.to_string(), "Send /add_event and type the name on its own")
                .await?;
        }
    }

    Ok(())
}

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::commands::Command;
use crate::bot::state::{HandlerResult, QueueDialogue, State};
use crate::bot::{keyboards, views};
use crate::config::Config;
use crate::database::{connection::DatabaseManager, models::Event};
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_command_start, log_command_success, log_database_error, Actor};

pub async fn handle_help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, Command::descriptions().to_string()).await?;
    Ok(())
}

pub async fn handle_start(
    bot: Bot,
    msg: Message,
    db: &DatabaseManager,
    config: &Arc<Config>,
) -> HandlerResult {
    let actor = Actor::from_message(&msg);
    log_command_start("start", &actor, None);

    let text = views::start_text(config.is_admin(actor.user_id));
    match Event::find_all(&db.pool).await {
        Ok(events) => {
            bot.send_message(msg.chat.id, text)
                .reply_markup(keyboards::events_keyboard(&events))
                .await?;
        }
        Err(e) => {
            // Greeting still goes out, just without the event buttons
            log_database_error("SELECT", "events", &e.to_string(), Some("start"));
            bot.send_message(msg.chat.id, text).await?;
        }
    }

    log_command_success("start", &actor, None);
    Ok(())
}

pub async fn handle_my_id(bot: Bot, msg: Message) -> HandlerResult {
    let actor = Actor::from_message(&msg);
    log_command_start("myid", &actor, None);

    bot.send_message(msg.chat.id, format!("Your Telegram ID: {}", actor.user_id))
        .await?;
    Ok(())
}

pub async fn handle_dashboard(bot: Bot, msg: Message, config: &Arc<Config>) -> HandlerResult {
    bot.send_message(msg.chat.id, format!("Dashboard: {}", config.dashboard_url))
        .await?;
    Ok(())
}

pub async fn handle_cancel(bot: Bot, msg: Message, dialogue: QueueDialogue) -> HandlerResult {
    let feedback = CommandFeedback::new(bot, msg.chat.id);

    match dialogue.get().await? {
        None | Some(State::Idle) => {
            feedback.info("Nothing to cancel").await?;
        }
        Some(_) => {
            dialogue.exit().await?;
            feedback.success("Cancelled").await?;
        }
    }
    Ok(())
}

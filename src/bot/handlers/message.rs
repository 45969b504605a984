use std::sync::Arc;

use teloxide::prelude::*;

use crate::bot::commands::{add_event, events, general, Command};
use crate::bot::state::{HandlerResult, QueueDialogue};
use crate::config::Config;
use crate::database::connection::DatabaseManager;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    dialogue: QueueDialogue,
    db: DatabaseManager,
    config: Arc<Config>,
) -> HandlerResult {
    match cmd {
        Command::Help => general::handle_help(bot, msg).await,
        Command::Start => general::handle_start(bot, msg, &db, &config).await,
        Command::Events(keyword) => events::handle_events(bot, msg, keyword, &db, &config).await,
        Command::MyId => general::handle_my_id(bot, msg).await,
        Command::Dashboard => general::handle_dashboard(bot, msg, &config).await,
        Command::AddEvent(name) => add_event::handle_add_event(bot, msg, name, dialogue, &config).await,
        Command::Cancel => general::handle_cancel(bot, msg, dialogue).await,
    }
}

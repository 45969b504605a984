pub mod add_event;
pub mod events;
pub mod general;

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Queue bot commands:")]
pub enum Command {
    #[command(description = "Display this help message")]
    Help,
    #[command(description = "Start the bot")]
    Start,
    #[command(description = "List events, or open one by keyword")]
    Events(String),
    #[command(description = "Show your Telegram ID")]
    MyId,
    #[command(description = "Link to the queue dashboard")]
    Dashboard,
    #[command(rename = "add_event", description = "Create an event (admin only)")]
    AddEvent(String),
    #[command(description = "Abort the current dialogue")]
    Cancel,
}

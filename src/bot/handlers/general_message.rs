use teloxide::prelude::*;
use teloxide::types::Me;

use crate::bot::state::HandlerResult;
use crate::utils::feedback::CommandFeedback;

/// Text sent outside of any dialogue.
pub async fn handle_general_message(bot: Bot, msg: Message, me: Me) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    if let Some(hint) = unknown_command_hint(text, me.username()) {
        let feedback = CommandFeedback::new(bot, msg.chat.id);
        feedback
            .validation_error(&hint, "Use /help to see all available commands")
            .await?;
    }
    // Other chatter is ignored to avoid spamming group chats
    Ok(())
}

/// Error text for something that looks like a command we don't know.
/// Commands addressed to another bot (`/start@otherbot`) are left alone.
pub fn unknown_command_hint(text: &str, bot_username: &str) -> Option<String> {
    let command = text.split_whitespace().next()?;
    if command.len() <= 1 || !command.starts_with('/') {
        return None;
    }

    if let Some((_, addressee)) = command.split_once('@') {
        if !addressee.eq_ignore_ascii_case(bot_username) {
            return None;
        }
    }

    Some(format!("Unknown command: {command}"))
}

//! Log helpers shared by the bot handlers.
//!
//! Every line starts with a fixed tag (`CMD_START`, `DB_ERROR`, ...) so the
//! output stays greppable, and carries the acting user and chat as fields.

use teloxide::types::{CallbackQuery, Message};
use tracing::{debug, error, info, warn};

/// Who triggered an update, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub name: String,
    pub user_id: u64,
    pub chat_id: i64,
}

impl Actor {
    pub fn from_message(msg: &Message) -> Self {
        let (name, user_id) = msg
            .from()
            .map(|u| (u.username.clone().unwrap_or_else(|| u.first_name.clone()), u.id.0))
            .unwrap_or_else(|| ("unknown".to_string(), 0));

        Self { name, user_id, chat_id: msg.chat.id.0 }
    }

    pub fn from_callback(q: &CallbackQuery) -> Self {
        Self {
            name: q.from.username.clone().unwrap_or_else(|| q.from.first_name.clone()),
            user_id: q.from.id.0,
            chat_id: q.message.as_ref().map(|m| m.chat.id.0).unwrap_or(0),
        }
    }
}

pub fn log_command_start(command: &str, actor: &Actor, details: Option<&str>) {
    info!(
        command,
        user = %actor.name,
        user_id = actor.user_id,
        chat_id = actor.chat_id,
        details = details.unwrap_or_default(),
        "CMD_START"
    );
}

pub fn log_command_success(command: &str, actor: &Actor, details: Option<&str>) {
    info!(
        command,
        user = %actor.name,
        user_id = actor.user_id,
        chat_id = actor.chat_id,
        details = details.unwrap_or_default(),
        "CMD_SUCCESS"
    );
}

pub fn log_command_error(command: &str, actor: &Actor, error: &str) {
    error!(
        command,
        user = %actor.name,
        user_id = actor.user_id,
        chat_id = actor.chat_id,
        error,
        "CMD_ERROR"
    );
}

/// A non-admin tried an admin-only action.
pub fn log_access_denied(action: &str, actor: &Actor) {
    warn!(
        action,
        user = %actor.name,
        user_id = actor.user_id,
        chat_id = actor.chat_id,
        "ACCESS_DENIED"
    );
}

pub fn log_validation_error(command: &str, field: &str, value: &str, error: &str, actor: &Actor) {
    warn!(
        command,
        field,
        value,
        error,
        user = %actor.name,
        user_id = actor.user_id,
        chat_id = actor.chat_id,
        "VALIDATION_ERROR"
    );
}

pub fn log_database_operation(operation: &str, table: &str, details: Option<&str>) {
    debug!(operation, table, details = details.unwrap_or_default(), "DB_OP");
}

pub fn log_database_error(operation: &str, table: &str, error: &str, details: Option<&str>) {
    error!(operation, table, error, details = details.unwrap_or_default(), "DB_ERROR");
}

pub fn log_system_event(event: &str, details: Option<&str>) {
    info!(event, details = details.unwrap_or_default(), "SYSTEM");
}

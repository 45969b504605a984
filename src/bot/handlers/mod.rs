pub mod callback;
pub mod general_message;
pub mod input;
pub mod message;

use std::sync::Arc;

use teloxide::{
    dispatching::{dialogue, dialogue::InMemStorage, UpdateHandler},
    prelude::*,
    types::Me,
};

use crate::bot::commands::Command;
use crate::bot::state::{QueueDialogue, State};
use crate::config::Config;
use crate::database::connection::DatabaseManager;

pub struct BotHandler {
    pub db: DatabaseManager,
    pub config: Arc<Config>,
}

impl BotHandler {
    pub fn new(db: DatabaseManager, config: Arc<Config>) -> Self {
        Self { db, config }
    }

    /// Commands win over dialogue input, so `/cancel` works mid-dialogue.
    pub fn schema(&self) -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
        use teloxide::dispatching::UpdateFilterExt;

        let db = self.db.clone();
        let config = self.config.clone();
        let commands = Update::filter_message()
            .filter_command::<Command>()
            .endpoint(move |bot: Bot, msg: Message, cmd: Command, dialogue: QueueDialogue| {
                let db = db.clone();
                let config = config.clone();
                async move { message::command_handler(bot, msg, cmd, dialogue, db, config).await }
            });

        let db_capacity = self.db.clone();
        let db_position = self.db.clone();
        let db_rename = self.db.clone();
        let dialogue_input = Update::filter_message()
            .branch(dptree::case![State::AwaitingEventName { admin_id }].endpoint(
                |bot: Bot, msg: Message, dialogue: QueueDialogue, admin_id: u64| async move {
                    input::receive_event_name(bot, msg, dialogue, admin_id).await
                },
            ))
            .branch(dptree::case![State::AwaitingMaxPositions { admin_id, name }].endpoint(
                move |bot: Bot, msg: Message, dialogue: QueueDialogue, step: (u64, String)| {
                    let db = db_capacity.clone();
                    async move { input::receive_max_positions(bot, msg, dialogue, step, db).await }
                },
            ))
            .branch(dptree::case![State::AwaitingPosition { event_id, user_id }].endpoint(
                move |bot: Bot, msg: Message, dialogue: QueueDialogue, step: (i64, u64)| {
                    let db = db_position.clone();
                    async move { input::receive_position(bot, msg, dialogue, step, db).await }
                },
            ))
            .branch(dptree::case![State::AwaitingNewName { event_id, admin_id }].endpoint(
                move |bot: Bot, msg: Message, dialogue: QueueDialogue, step: (i64, u64)| {
                    let db = db_rename.clone();
                    async move { input::receive_new_name(bot, msg, dialogue, step, db).await }
                },
            ))
            .branch(dptree::case![State::Idle].endpoint(|bot: Bot, msg: Message, me: Me| async move {
                general_message::handle_general_message(bot, msg, me).await
            }));

        let db_callback = self.db.clone();
        let config_callback = self.config.clone();
        let callbacks = Update::filter_callback_query().endpoint(
            move |bot: Bot, q: CallbackQuery, dialogue: QueueDialogue| {
                let db = db_callback.clone();
                let config = config_callback.clone();
                async move { callback::callback_handler(bot, q, dialogue, db, config).await }
            },
        );

        dialogue::enter::<Update, InMemStorage<State>, State, _>()
            .branch(commands)
            .branch(dialogue_input)
            .branch(callbacks)
    }
}

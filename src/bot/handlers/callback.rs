use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::InlineKeyboardMarkup;
use teloxide::{ApiError, RequestError};

use crate::bot::keyboards::{self, CallbackAction};
use crate::bot::state::{HandlerResult, QueueDialogue, State};
use crate::bot::views;
use crate::config::Config;
use crate::database::{connection::DatabaseManager, models::*};
use crate::utils::logging::{
    log_access_denied, log_command_start, log_command_success, log_database_error,
    log_database_operation, Actor,
};

const DB_FAILURE: &str = "Something went wrong, please try again";
const NOT_REGISTERED: &str = "You're not registered for this event";

/// Everything a callback action needs besides the action itself.
struct CallbackContext<'a> {
    bot: &'a Bot,
    message: &'a Message,
    dialogue: &'a QueueDialogue,
    db: &'a DatabaseManager,
    actor: Actor,
    is_admin: bool,
}

pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    dialogue: QueueDialogue,
    db: DatabaseManager,
    config: Arc<Config>,
) -> HandlerResult {
    let actor = Actor::from_callback(&q);

    let Some(data) = q.data.as_deref() else {
        bot.answer_callback_query(q.id).text("Invalid callback data").await?;
        return Ok(());
    };
    log_command_start("callback", &actor, Some(data));

    let Some(action) = CallbackAction::parse(data) else {
        bot.answer_callback_query(q.id).text("Invalid callback data").await?;
        return Ok(());
    };

    let Some(message) = q.message.as_ref() else {
        bot.answer_callback_query(q.id)
            .text("This menu is no longer available, use /events")
            .await?;
        return Ok(());
    };

    let ctx = CallbackContext {
        bot: &bot,
        message,
        dialogue: &dialogue,
        db: &db,
        is_admin: config.is_admin(actor.user_id),
        actor,
    };

    let toast = match action {
        CallbackAction::NoEvents => Some("No events yet. Use /add_event".to_string()),
        CallbackAction::Back => show_events(&ctx).await?,
        CallbackAction::Event(event_id) => show_event(&ctx, event_id).await?,
        CallbackAction::Register(event_id) => start_registration(&ctx, event_id).await?,
        CallbackAction::Queue(event_id) => show_queue(&ctx, event_id).await?,
        CallbackAction::Cancel(event_id) => cancel_registration(&ctx, event_id).await?,
        CallbackAction::Delete(event_id) => delete_event(&ctx, event_id).await?,
        CallbackAction::Rename(event_id) => start_rename(&ctx, event_id).await?,
    };

    let mut answer = bot.answer_callback_query(q.id.clone());
    if let Some(text) = toast {
        answer = answer.text(text);
    }
    answer.await?;
    Ok(())
}

/// Edits the menu message in place. Re-rendering identical content is not an error.
async fn edit_view(
    ctx: &CallbackContext<'_>,
    text: String,
    keyboard: Option<InlineKeyboardMarkup>,
) -> Result<(), RequestError> {
    let mut request = ctx
        .bot
        .edit_message_text(ctx.message.chat.id, ctx.message.id, text);
    if let Some(keyboard) = keyboard {
        request = request.reply_markup(keyboard);
    }

    match request.await {
        Ok(_) | Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
        Err(e) => Err(e),
    }
}

type Toast = Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>;

/// The event, or the toast to show when it can't be loaded.
async fn load_event(ctx: &CallbackContext<'_>, event_id: i64) -> Result<Event, String> {
    match Event::find_by_id(&ctx.db.pool, event_id).await {
        Ok(Some(event)) => Ok(event),
        Ok(None) => Err("Event not found".to_string()),
        Err(e) => {
            log_database_error("SELECT", "events", &e.to_string(), Some(&format!("event {event_id}")));
            Err(DB_FAILURE.to_string())
        }
    }
}

async fn render_card(ctx: &CallbackContext<'_>, event: &Event) -> Toast {
    let queue = match QueueEntry::find_by_event(&ctx.db.pool, event.id).await {
        Ok(queue) => queue,
        Err(e) => {
            log_database_error("SELECT", "queue", &e.to_string(), Some(&event.name));
            return Ok(Some(DB_FAILURE.to_string()));
        }
    };

    edit_view(
        ctx,
        views::event_card(event, queue.len()),
        Some(keyboards::event_actions_keyboard(event.id, ctx.is_admin)),
    )
    .await?;
    Ok(None)
}

async fn show_events(ctx: &CallbackContext<'_>) -> Toast {
    ctx.dialogue.exit().await?;

    let events = match Event::find_all(&ctx.db.pool).await {
        Ok(events) => events,
        Err(e) => {
            log_database_error("SELECT", "events", &e.to_string(), None);
            return Ok(Some(DB_FAILURE.to_string()));
        }
    };

    edit_view(
        ctx,
        views::CHOOSE_EVENT.to_string(),
        Some(keyboards::events_keyboard(&events)),
    )
    .await?;
    Ok(None)
}

async fn show_event(ctx: &CallbackContext<'_>, event_id: i64) -> Toast {
    match load_event(ctx, event_id).await {
        Ok(event) => render_card(ctx, &event).await,
        Err(toast) => Ok(Some(toast)),
    }
}

async fn start_registration(ctx: &CallbackContext<'_>, event_id: i64) -> Toast {
    let event = match load_event(ctx, event_id).await {
        Ok(event) => event,
        Err(toast) => return Ok(Some(toast)),
    };

    let queue = match QueueEntry::find_by_event(&ctx.db.pool, event.id).await {
        Ok(queue) => queue,
        Err(e) => {
            log_database_error("SELECT", "queue", &e.to_string(), Some(&event.name));
            return Ok(Some(DB_FAILURE.to_string()));
        }
    };

    let user_id = ctx.actor.user_id;
    let own_id = db_user_id(user_id);
    if let Some(own) = queue.iter().find(|entry| Some(entry.user_id) == own_id) {
        return Ok(Some(format!("You're already in position {}", own.position)));
    }

    let taken: Vec<i64> = queue.iter().map(|entry| entry.position).collect();
    let available = available_positions(event.max_positions, &taken);

    if available.is_empty() {
        edit_view(
            ctx,
            format!("{}\n\nAll positions are taken", views::event_card(&event, queue.len())),
            Some(keyboards::event_actions_keyboard(event.id, ctx.is_admin)),
        )
        .await?;
        return Ok(None);
    }

    ctx.dialogue
        .update(State::AwaitingPosition { event_id: event.id, user_id })
        .await?;
    edit_view(
        ctx,
        views::position_prompt(event.max_positions, &available),
        Some(keyboards::back_keyboard()),
    )
    .await?;
    Ok(None)
}

async fn show_queue(ctx: &CallbackContext<'_>, event_id: i64) -> Toast {
    let event = match load_event(ctx, event_id).await {
        Ok(event) => event,
        Err(toast) => return Ok(Some(toast)),
    };

    let queue = match QueueEntry::find_by_event(&ctx.db.pool, event.id).await {
        Ok(queue) => queue,
        Err(e) => {
            log_database_error("SELECT", "queue", &e.to_string(), Some(&event.name));
            return Ok(Some(DB_FAILURE.to_string()));
        }
    };

    edit_view(
        ctx,
        views::queue_listing(&event, &queue),
        Some(keyboards::event_actions_keyboard(event.id, ctx.is_admin)),
    )
    .await?;
    Ok(None)
}

async fn cancel_registration(ctx: &CallbackContext<'_>, event_id: i64) -> Toast {
    let Some(user_id) = db_user_id(ctx.actor.user_id) else {
        return Ok(Some(NOT_REGISTERED.to_string()));
    };
    log_database_operation("DELETE", "queue", Some(&format!("event {event_id} user {user_id}")));

    match QueueEntry::cancel(&ctx.db.pool, event_id, user_id).await {
        Ok(true) => {
            log_command_success("cancel_registration", &ctx.actor, Some(&format!("event {event_id}")));
            if let Ok(event) = load_event(ctx, event_id).await {
                render_card(ctx, &event).await?;
            }
            Ok(Some("Registration cancelled".to_string()))
        }
        Ok(false) => Ok(Some(NOT_REGISTERED.to_string())),
        Err(e) => {
            log_database_error("DELETE", "queue", &e.to_string(), Some(&format!("event {event_id}")));
            Ok(Some(DB_FAILURE.to_string()))
        }
    }
}

async fn delete_event(ctx: &CallbackContext<'_>, event_id: i64) -> Toast {
    if !ctx.is_admin {
        log_access_denied("delete_event", &ctx.actor);
        return Ok(Some("Only the admin can delete events".to_string()));
    }

    let event = match load_event(ctx, event_id).await {
        Ok(event) => event,
        Err(toast) => return Ok(Some(toast)),
    };

    log_database_operation("DELETE", "events", Some(&event.name));
    match Event::delete(&ctx.db.pool, event.id).await {
        Ok(true) => {
            log_command_success("delete_event", &ctx.actor, Some(&event.name));
            show_events(ctx).await?;
            Ok(Some(format!("Event '{}' deleted", event.name)))
        }
        Ok(false) => Ok(Some("Event not found".to_string())),
        Err(e) => {
            log_database_error("DELETE", "events", &e.to_string(), Some(&event.name));
            Ok(Some(DB_FAILURE.to_string()))
        }
    }
}

async fn start_rename(ctx: &CallbackContext<'_>, event_id: i64) -> Toast {
    if !ctx.is_admin {
        log_access_denied("rename_event", &ctx.actor);
        return Ok(Some("Only the admin can rename events".to_string()));
    }

    let event = match load_event(ctx, event_id).await {
        Ok(event) => event,
        Err(toast) => return Ok(Some(toast)),
    };

    ctx.dialogue
        .update(State::AwaitingNewName { event_id: event.id, admin_id: ctx.actor.user_id })
        .await?;
    edit_view(
        ctx,
        format!("Enter a new name for '{}':", event.name),
        Some(keyboards::back_keyboard()),
    )
    .await?;
    Ok(None)
}

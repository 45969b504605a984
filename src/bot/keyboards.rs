//! Inline keyboards and the callback data they carry.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::database::models::Event;

/// Payload of an inline button, encoded as `action:event_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Event(i64),
    Register(i64),
    Queue(i64),
    Cancel(i64),
    Delete(i64),
    Rename(i64),
    Back,
    NoEvents,
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "back" => return Some(CallbackAction::Back),
            "no_events" => return Some(CallbackAction::NoEvents),
            _ => {}
        }

        let (action, id) = data.split_once(':')?;
        let id: i64 = id.parse().ok()?;

        match action {
            "event" => Some(CallbackAction::Event(id)),
            "register" => Some(CallbackAction::Register(id)),
            "queue" => Some(CallbackAction::Queue(id)),
            "cancel" => Some(CallbackAction::Cancel(id)),
            "delete" => Some(CallbackAction::Delete(id)),
            "rename" => Some(CallbackAction::Rename(id)),
            _ => None,
        }
    }

    pub fn encode(&self) -> String {
        match self {
            CallbackAction::Event(id) => format!("event:{id}"),
            CallbackAction::Register(id) => format!("register:{id}"),
            CallbackAction::Queue(id) => format!("queue:{id}"),
            CallbackAction::Cancel(id) => format!("cancel:{id}"),
            CallbackAction::Delete(id) => format!("delete:{id}"),
            CallbackAction::Rename(id) => format!("rename:{id}"),
            CallbackAction::Back => "back".to_string(),
            CallbackAction::NoEvents => "no_events".to_string(),
        }
    }
}

fn button(text: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, action.encode())
}

/// One button per event, or a single placeholder when there are none.
pub fn events_keyboard(events: &[Event]) -> InlineKeyboardMarkup {
    if events.is_empty() {
        return InlineKeyboardMarkup::new(vec![vec![button("No events", CallbackAction::NoEvents)]]);
    }

    let rows = events
        .iter()
        .map(|event| vec![button(event.name.clone(), CallbackAction::Event(event.id))]);
    InlineKeyboardMarkup::new(rows)
}

/// Menu of a single event. Delete and rename are only offered to the admin.
pub fn event_actions_keyboard(event_id: i64, is_admin: bool) -> InlineKeyboardMarkup {
    let mut rows = vec![
        vec![button("📝 Join queue", CallbackAction::Register(event_id))],
        vec![button("📋 View queue", CallbackAction::Queue(event_id))],
        vec![button("❌ Leave queue", CallbackAction::Cancel(event_id))],
    ];

    if is_admin {
        rows.push(vec![
            button("✏️ Rename event", CallbackAction::Rename(event_id)),
            button("🗑 Delete event", CallbackAction::Delete(event_id)),
        ]);
    }

    rows.push(vec![button("⬅️ Back", CallbackAction::Back)]);
    InlineKeyboardMarkup::new(rows)
}

pub fn back_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button("⬅️ Back", CallbackAction::Back)]])
}

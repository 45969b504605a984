use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

/// Per-chat conversation state. Steps tied to one user remember who it is,
/// so other members of a group chat can't answer for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum State {
    #[default]
    Idle,
    AwaitingEventName { admin_id: u64 },
    AwaitingMaxPositions { admin_id: u64, name: String },
    AwaitingPosition { event_id: i64, user_id: u64 },
    AwaitingNewName { event_id: i64, admin_id: u64 },
}

pub type QueueDialogue = Dialogue<State, InMemStorage<State>>;

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

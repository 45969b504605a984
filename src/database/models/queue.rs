use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::event::{is_busy, is_unique_violation};

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct QueueEntry {
    pub event_id: i64,
    pub position: i64,
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub registered_at: String,
}

/// The Telegram user claiming a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueUser {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered { position: i64 },
    EventNotFound,
    OutOfRange { max: i64 },
    PositionTaken { position: i64, holder: String },
    AlreadyRegistered { position: i64 },
    /// Lost a race against a concurrent registration.
    Conflict,
}

impl RegistrationOutcome {
    pub fn is_registered(&self) -> bool {
        matches!(self, RegistrationOutcome::Registered { .. })
    }

    pub fn message(&self) -> String {
        match self {
            RegistrationOutcome::Registered { position } => {
                format!("✅ You're in position {position}")
            }
            RegistrationOutcome::EventNotFound => "❌ Event not found".to_string(),
            RegistrationOutcome::OutOfRange { max } => {
                format!("❌ Position must be between 1 and {max}")
            }
            RegistrationOutcome::PositionTaken { position, holder } => {
                format!("❌ Position {position} is already taken ({holder})")
            }
            RegistrationOutcome::AlreadyRegistered { position } => {
                format!("⚠️ You're already registered in position {position}")
            }
            RegistrationOutcome::Conflict => {
                "❌ Registration failed, please try again".to_string()
            }
        }
    }
}

impl QueueEntry {
    /// Claims `position` in the event's queue for `user`.
    ///
    /// The insert is a single statement guarded by the event's bounds, so
    /// SQLite takes the write lock before anything is read and the unique
    /// constraints on `queue` settle who was first. A refused insert is then
    /// explained by reading the current state.
    pub async fn register(
        pool: &sqlx::SqlitePool,
        event_id: i64,
        position: i64,
        user: &QueueUser,
    ) -> Result<RegistrationOutcome, sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        let inserted = sqlx::query(
            r#"
            INSERT INTO queue (event_id, position, user_id, username, first_name, registered_at)
            SELECT id, ?, ?, ?, ?, ?
            FROM events
            WHERE id = ? AND ? BETWEEN 1 AND max_positions
            "#
        )
        .bind(position)
        .bind(user.user_id)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&now)
        .bind(event_id)
        .bind(position)
        .execute(pool)
        .await;

        match inserted {
            Ok(result) if result.rows_affected() > 0 => {
                Ok(RegistrationOutcome::Registered { position })
            }
            Ok(_) => Self::explain_out_of_bounds(pool, event_id).await,
            Err(e) if is_unique_violation(&e) => {
                Self::explain_collision(pool, event_id, position, user.user_id).await
            }
            Err(e) if is_busy(&e) => Ok(RegistrationOutcome::Conflict),
            Err(e) => Err(e),
        }
    }

    /// Nothing was inserted: the event is gone or the position is outside it.
    async fn explain_out_of_bounds(
        pool: &sqlx::SqlitePool,
        event_id: i64,
    ) -> Result<RegistrationOutcome, sqlx::Error> {
        let max_positions: Option<(i64,)> =
            sqlx::query_as("SELECT max_positions FROM events WHERE id = ?")
                .bind(event_id)
                .fetch_optional(pool)
                .await?;

        Ok(match max_positions {
            Some((max,)) => RegistrationOutcome::OutOfRange { max },
            None => RegistrationOutcome::EventNotFound,
        })
    }

    /// The insert hit a unique constraint: the position is held, or the user already has one.
    async fn explain_collision(
        pool: &sqlx::SqlitePool,
        event_id: i64,
        position: i64,
        user_id: i64,
    ) -> Result<RegistrationOutcome, sqlx::Error> {
        let holder = sqlx::query_as::<_, QueueEntry>(
            "SELECT event_id, position, user_id, username, first_name, registered_at
             FROM queue WHERE event_id = ? AND position = ?"
        )
        .bind(event_id)
        .bind(position)
        .fetch_optional(pool)
        .await?;

        if let Some(holder) = holder {
            return Ok(RegistrationOutcome::PositionTaken {
                position,
                holder: holder.holder_name(),
            });
        }

        if let Some(own) = Self::find_for_user(pool, event_id, user_id).await? {
            return Ok(RegistrationOutcome::AlreadyRegistered { position: own.position });
        }

        // The conflicting row was removed in the meantime
        Ok(RegistrationOutcome::Conflict)
    }

    /// Frees the user's position. Returns `false` if they weren't queued.
    pub async fn cancel(
        pool: &sqlx::SqlitePool,
        event_id: i64,
        user_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM queue WHERE event_id = ? AND user_id = ?")
            .bind(event_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_event(
        pool: &sqlx::SqlitePool,
        event_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, QueueEntry>(
            "SELECT event_id, position, user_id, username, first_name, registered_at
             FROM queue WHERE event_id = ? ORDER BY position"
        )
        .bind(event_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_for_user(
        pool: &sqlx::SqlitePool,
        event_id: i64,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, QueueEntry>(
            "SELECT event_id, position, user_id, username, first_name, registered_at
             FROM queue WHERE event_id = ? AND user_id = ?"
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Every queue row, grouped by event and ordered by position.
    pub async fn find_all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, QueueEntry>(
            "SELECT event_id, position, user_id, username, first_name, registered_at
             FROM queue ORDER BY event_id, position"
        )
        .fetch_all(pool)
        .await
    }

    /// Name shown in queue listings.
    pub fn display_name(&self) -> &str {
        non_blank(&self.first_name)
            .or_else(|| non_blank(&self.username))
            .unwrap_or("—")
    }

    fn holder_name(&self) -> String {
        non_blank(&self.first_name)
            .or_else(|| non_blank(&self.username))
            .map(str::to_string)
            .unwrap_or_else(|| format!("ID:{}", self.user_id))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Telegram user ids are unsigned; the queue stores them as SQLite integers.
pub fn db_user_id(user_id: u64) -> Option<i64> {
    i64::try_from(user_id).ok()
}

/// Free positions in `1..=max`, ascending. The first one is the nearest free slot.
pub fn available_positions(max: i64, taken: &[i64]) -> Vec<i64> {
    (1..=max).filter(|p| !taken.contains(p)).collect()
}

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Capacity used when the admin doesn't give one.
pub const DEFAULT_MAX_POSITIONS: i64 = 30;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub max_positions: i64,
    pub created_at: String,
}

impl Event {
    /// Inserts a new event. Returns `None` when the name is already in use.
    pub async fn create(
        pool: &sqlx::SqlitePool,
        name: &str,
        max_positions: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        if Self::find_by_name(pool, name).await?.is_some() {
            return Ok(None);
        }

        let now = Utc::now().to_rfc3339();
        let inserted = sqlx::query(
            "INSERT INTO events (name, max_positions, created_at) VALUES (?, ?, ?)"
        )
        .bind(name)
        .bind(max_positions)
        .bind(&now)
        .execute(pool)
        .await;

        match inserted {
            Ok(result) => Self::find_by_id(pool, result.last_insert_rowid()).await,
            Err(e) if is_unique_violation(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn find_all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Event>(
            "SELECT id, name, max_positions, created_at FROM events ORDER BY name"
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        event_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Event>(
            "SELECT id, name, max_positions, created_at FROM events WHERE id = ?"
        )
        .bind(event_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_name(
        pool: &sqlx::SqlitePool,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Event>(
            "SELECT id, name, max_positions, created_at FROM events WHERE name = ?"
        )
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    /// Case-insensitive partial name match; the most recently created event wins.
    ///
    /// Matching happens in Rust because SQLite's `LOWER` and `LIKE` only fold ASCII.
    pub async fn find_by_keyword(
        pool: &sqlx::SqlitePool,
        keyword: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let keyword = keyword.trim().to_lowercase();
        let events = sqlx::query_as::<_, Event>(
            "SELECT id, name, max_positions, created_at FROM events
             ORDER BY created_at DESC, id DESC"
        )
        .fetch_all(pool)
        .await?;

        Ok(events
            .into_iter()
            .find(|event| event.name.to_lowercase().contains(&keyword)))
    }

    /// Returns `false` if the event is gone or another event already has `new_name`.
    pub async fn rename(
        pool: &sqlx::SqlitePool,
        event_id: i64,
        new_name: &str,
    ) -> Result<bool, sqlx::Error> {
        if let Some(existing) = Self::find_by_name(pool, new_name).await? {
            return Ok(existing.id == event_id);
        }

        let renamed = sqlx::query("UPDATE events SET name = ? WHERE id = ?")
            .bind(new_name)
            .bind(event_id)
            .execute(pool)
            .await;

        match renamed {
            Ok(result) => Ok(result.rows_affected() > 0),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Deletes the event together with its whole queue.
    pub async fn delete(pool: &sqlx::SqlitePool, event_id: i64) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM queue WHERE event_id = ?")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

/// `SQLITE_BUSY` and its extended codes: another writer held the lock past the busy timeout.
pub(crate) fn is_busy(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error
            .code()
            .and_then(|code| code.parse::<i32>().ok())
            .is_some_and(|code| code & 0xff == 5),
        _ => false,
    }
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error.message().contains("UNIQUE constraint failed"),
        _ => false,
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::event::Event;
use super::queue::QueueEntry;

/// An event together with its current queue, as shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventOverview {
    #[serde(flatten)]
    pub event: Event,
    pub taken: usize,
    pub queue: Vec<QueueEntry>,
}

impl EventOverview {
    /// Loads every event (by name) with its queue (by position) in two queries.
    pub async fn load_all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        let events = Event::find_all(pool).await?;
        if events.is_empty() {
            return Ok(Vec::new());
        }

        let mut queues_by_event: HashMap<i64, Vec<QueueEntry>> = HashMap::new();
        for entry in QueueEntry::find_all(pool).await? {
            queues_by_event.entry(entry.event_id).or_default().push(entry);
        }

        Ok(events
            .into_iter()
            .map(|event| {
                let queue = queues_by_event.remove(&event.id).unwrap_or_default();
                EventOverview {
                    taken: queue.len(),
                    event,
                    queue,
                }
            })
            .collect())
    }
}

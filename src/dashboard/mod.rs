//! Read-only web view of the queues.
//!
//! Serves an HTML overview at `/`, the same data as JSON at `/api/events`,
//! and health probes under `/health`.

pub mod health;
pub mod routes;
pub mod server;
pub mod templates;

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::database::connection::DatabaseManager;

pub use server::{bind, router, serve};

#[derive(Clone)]
pub struct DashboardState {
    pub db: Arc<DatabaseManager>,
    pub start_time: DateTime<Utc>,
}

impl DashboardState {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self {
            db,
            start_time: Utc::now(),
        }
    }
}

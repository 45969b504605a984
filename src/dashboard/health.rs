use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::DashboardState;
use crate::database::connection::DatabaseManager;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub database: DatabaseHealth,
    pub uptime_seconds: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub status: String,
    pub connection_pool_size: u32,
    pub response_time_ms: u64,
    pub events: i64,
}

pub async fn health_check(
    State(state): State<DashboardState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    let start = Instant::now();
    let events = count_events(&state.db)
        .await
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseHealth {
            status: "healthy".to_string(),
            connection_pool_size: state.db.pool.size(),
            response_time_ms: start.elapsed().as_millis() as u64,
            events,
        },
        uptime_seconds: Utc::now()
            .signed_duration_since(state.start_time)
            .num_seconds(),
    }))
}

pub async fn readiness_check(
    State(state): State<DashboardState>,
) -> Result<Json<&'static str>, StatusCode> {
    match count_events(&state.db).await {
        Ok(_) => Ok(Json("ready")),
        Err(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

/// Answers as long as the process is up.
pub async fn liveness_check() -> Json<&'static str> {
    Json("alive")
}

/// Doubles as the connectivity probe: fails if the schema isn't there either.
async fn count_events(db: &DatabaseManager) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
        .fetch_one(&db.pool)
        .await?;
    Ok(count)
}

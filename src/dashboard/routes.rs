use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
};

use super::{templates, DashboardState};
use crate::database::models::EventOverview;
use crate::utils::logging::log_database_error;

// ── GET /: HTML overview of every queue ──────────────────────────────

pub async fn index(State(state): State<DashboardState>) -> Response {
    let overviews = match EventOverview::load_all(&state.db.pool).await {
        Ok(overviews) => overviews,
        Err(e) => {
            log_database_error("SELECT", "events", &e.to_string(), Some("dashboard"));
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Failed to load queues</h1>".to_string()),
            )
                .into_response();
        }
    };

    match templates::render_dashboard(&overviews) {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            tracing::error!("Template error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Failed to render dashboard</h1>".to_string()),
            )
                .into_response()
        }
    }
}

// ── GET /api/events: the same data as JSON ───────────────────────────

pub async fn events_json(
    State(state): State<DashboardState>,
) -> Result<Json<Vec<EventOverview>>, StatusCode> {
    EventOverview::load_all(&state.db.pool)
        .await
        .map(Json)
        .map_err(|e| {
            log_database_error("SELECT", "events", &e.to_string(), Some("api"));
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::{health, routes, DashboardState};
use crate::database::connection::DatabaseManager;
use crate::utils::logging::log_system_event;

pub fn router(db: Arc<DatabaseManager>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/api/events", get(routes::events_json))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(DashboardState::new(db))
}

/// Binds the dashboard port on all interfaces.
pub async fn bind(port: u16) -> anyhow::Result<TcpListener> {
    TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", port, e))
}

pub async fn serve(listener: TcpListener, db: Arc<DatabaseManager>) -> anyhow::Result<()> {
    let addr = listener.local_addr()?.to_string();
    log_system_event("dashboard listening", Some(&addr));

    axum::serve(listener, router(db)).await?;
    Ok(())
}

//! Runs only the web dashboard against the queue database.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use queue_bot::config::{database_url_from_env, http_port_from_env};
use queue_bot::dashboard;
use queue_bot::database::connection::DatabaseManager;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "queue_bot=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let database_url = database_url_from_env();
    let port = http_port_from_env()?;

    info!("Starting queue dashboard - Database: {}, HTTP Port: {}", database_url, port);

    let db = DatabaseManager::new(&database_url).await?;
    db.run_migrations().await?;

    let listener = dashboard::bind(port).await?;
    dashboard::serve(listener, Arc::new(db)).await
}

//! # Queue Bot Main Entry Point
//!
//! Initializes logging, loads configuration, sets up the database, and runs
//! the Telegram bot and the web dashboard side by side.

use anyhow::Result;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use queue_bot::bot::commands::Command;
use queue_bot::bot::handlers::BotHandler;
use queue_bot::bot::state::State;
use queue_bot::config::Config;
use queue_bot::dashboard;
use queue_bot::database::connection::DatabaseManager;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "queue_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Arc::new(Config::from_env()?);

    info!("Starting Queue Bot v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded - Database: {}, HTTP Port: {}, Admin configured: {}",
        config.database_url, config.http_port, config.admin_id != 0);

    // Initialize database
    info!("Initializing database connection...");
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    info!("Running database migrations...");
    db_manager.run_migrations().await?;
    let db_arc = Arc::new(db_manager);
    info!("Database initialized successfully");

    // Initialize bot
    info!("Initializing Telegram bot...");
    let bot = Bot::new(&config.bot_token);
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!("Failed to register command menu: {}", e);
    }
    let handler = BotHandler::new(db_arc.as_ref().clone(), config.clone());
    info!("Telegram bot initialized successfully");

    // Bind before spawning so a taken port fails startup
    let listener = dashboard::bind(config.http_port).await?;
    info!("Dashboard starting on port {}", config.http_port);

    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .dependencies(dptree::deps![InMemStorage::<State>::new()])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let dashboard_db = db_arc.clone();
    let dashboard_task = tokio::spawn(async move {
        if let Err(e) = dashboard::serve(listener, dashboard_db).await {
            tracing::error!("Dashboard server error: {}", e);
        }
    });

    // Either task finishing means shutdown
    tokio::select! {
        result = bot_task => {
            if let Err(e) = result {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result = dashboard_task => {
            if let Err(e) = result {
                tracing::error!("Dashboard task error: {}", e);
            }
        }
    }

    db_arc.pool.close().await;
    info!("Application stopped");
    Ok(())
}

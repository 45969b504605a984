use std::sync::Arc;

use queue_bot::bot::handlers::BotHandler;
use queue_bot::bot::state::State;
use queue_bot::config::Config;
use queue_bot::database::connection::DatabaseManager;
use teloxide::dispatching::dialogue::{InMemStorage, Storage};
use teloxide::types::ChatId;
use tempfile::TempDir;

fn test_config() -> Arc<Config> {
    Arc::new(Config {
        bot_token: "test_token".to_string(),
        admin_id: 1,
        dashboard_url: "http://localhost:8080".to_string(),
        database_url: "sqlite::memory:".to_string(),
        http_port: 8080,
    })
}

#[tokio::test]
async fn test_schema_builds() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

    let db = DatabaseManager::new(&db_url)
        .await
        .expect("Failed to create test database");
    db.run_migrations().await.expect("Failed to run migrations");

    let handler = BotHandler::new(db, test_config());

    // Building the handler tree must not panic
    let _schema = handler.schema();
}

#[tokio::test]
async fn test_dialogue_state_round_trips_through_storage() {
    let storage = InMemStorage::<State>::new();
    let chat = ChatId(-100123);
    let state = State::AwaitingPosition { event_id: 7, user_id: 42 };

    storage
        .clone()
        .update_dialogue(chat, state.clone())
        .await
        .expect("Failed to store dialogue");

    let stored = storage.clone().get_dialogue(chat).await.expect("Failed to read dialogue");
    assert_eq!(stored, Some(state));

    storage.clone().remove_dialogue(chat).await.expect("Failed to remove dialogue");
    let stored = storage.get_dialogue(chat).await.expect("Failed to read dialogue");
    assert_eq!(stored, None);
}

#[test]
fn test_default_state_is_idle() {
    assert_eq!(State::default(), State::Idle);
}

use anyhow::Result;
use queue_bot::database::{connection::DatabaseManager, models::*};
use tempfile::{tempdir, TempDir};
use tokio_test::assert_ok;

async fn setup_test_db() -> Result<(DatabaseManager, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db_manager = DatabaseManager::new(&database_url).await?;
    db_manager.run_migrations().await?;

    Ok((db_manager, temp_dir))
}

fn user(user_id: i64, first_name: Option<&str>, username: Option<&str>) -> QueueUser {
    QueueUser {
        user_id,
        username: username.map(str::to_string),
        first_name: first_name.map(str::to_string),
    }
}

async fn create_event(db: &DatabaseManager, name: &str, max_positions: i64) -> Result<Event> {
    Event::create(&db.pool, name, max_positions)
        .await?
        .ok_or_else(|| anyhow::anyhow!("event '{name}' already exists"))
}

#[tokio::test]
async fn test_migrations_create_tables() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let tables = db.table_names().await?;
    assert!(tables.contains(&"events".to_string()));
    assert!(tables.contains(&"queue".to_string()));

    Ok(())
}

#[tokio::test]
async fn test_event_creation_and_retrieval() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let event = create_event(&db, "Lab 1", 25).await?;
    assert_eq!(event.name, "Lab 1");
    assert_eq!(event.max_positions, 25);
    assert!(chrono::DateTime::parse_from_rfc3339(&event.created_at).is_ok());

    let found = Event::find_by_id(&db.pool, event.id).await?;
    assert_eq!(found, Some(event));

    assert!(Event::find_by_id(&db.pool, 9999).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_duplicate_event_name_is_refused() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    create_event(&db, "Lab 1", 30).await?;
    let duplicate = Event::create(&db.pool, "Lab 1", 10).await?;
    assert!(duplicate.is_none());

    assert_eq!(Event::find_all(&db.pool).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_events_are_listed_by_name() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    create_event(&db, "Physics", 30).await?;
    create_event(&db, "Algebra", 30).await?;
    create_event(&db, "Chemistry", 30).await?;

    let names: Vec<String> = Event::find_all(&db.pool)
        .await?
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["Algebra", "Chemistry", "Physics"]);

    Ok(())
}

#[tokio::test]
async fn test_find_by_keyword() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    create_event(&db, "Physics lab 1", 30).await?;
    let newest = create_event(&db, "Physics lab 2", 30).await?;
    create_event(&db, "Algebra", 30).await?;

    let found = Event::find_by_keyword(&db.pool, "PHYSICS").await?;
    assert_eq!(found.map(|e| e.id), Some(newest.id));

    let found = Event::find_by_keyword(&db.pool, "gebr").await?;
    assert_eq!(found.map(|e| e.name), Some("Algebra".to_string()));

    assert!(Event::find_by_keyword(&db.pool, "history").await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_find_by_keyword_folds_non_ascii_case() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let lab = create_event(&db, "Лаба 1", 30).await?;
    create_event(&db, "Physics", 30).await?;

    for keyword in ["Лаба", "лаба", "ЛАБА 1", " аба "] {
        let found = Event::find_by_keyword(&db.pool, keyword).await?;
        assert_eq!(found.map(|e| e.id), Some(lab.id), "keyword {keyword:?}");
    }

    // Wildcards are plain text
    assert!(Event::find_by_keyword(&db.pool, "%").await?.is_none());
    assert!(Event::find_by_keyword(&db.pool, "_").await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_rename_event() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let lab = create_event(&db, "Lab 1", 30).await?;
    create_event(&db, "Lab 2", 30).await?;

    assert!(Event::rename(&db.pool, lab.id, "Lab 1 (retake)").await?);
    let renamed = Event::find_by_id(&db.pool, lab.id).await?;
    assert_eq!(renamed.map(|e| e.name), Some("Lab 1 (retake)".to_string()));

    // Taken name and missing event are both refused
    assert!(!Event::rename(&db.pool, lab.id, "Lab 2").await?);
    assert!(!Event::rename(&db.pool, 9999, "Lab 3").await?);

    Ok(())
}

#[tokio::test]
async fn test_register_position() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let event = create_event(&db, "Lab 1", 10).await?;

    let outcome = QueueEntry::register(&db.pool, event.id, 3, &user(100, Some("Anna"), None)).await?;
    assert_eq!(outcome, RegistrationOutcome::Registered { position: 3 });

    let queue = QueueEntry::find_by_event(&db.pool, event.id).await?;
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].position, 3);
    assert_eq!(queue[0].user_id, 100);
    assert_eq!(queue[0].display_name(), "Anna");

    Ok(())
}

#[tokio::test]
async fn test_register_taken_position_names_holder() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let event = create_event(&db, "Lab 1", 10).await?;

    QueueEntry::register(&db.pool, event.id, 1, &user(100, None, Some("anna_k"))).await?;
    QueueEntry::register(&db.pool, event.id, 2, &user(101, None, None)).await?;

    let outcome = QueueEntry::register(&db.pool, event.id, 1, &user(200, Some("Bob"), None)).await?;
    assert_eq!(
        outcome,
        RegistrationOutcome::PositionTaken { position: 1, holder: "anna_k".to_string() }
    );

    let outcome = QueueEntry::register(&db.pool, event.id, 2, &user(200, Some("Bob"), None)).await?;
    assert_eq!(
        outcome,
        RegistrationOutcome::PositionTaken { position: 2, holder: "ID:101".to_string() }
    );

    Ok(())
}

#[tokio::test]
async fn test_one_position_per_user() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let event = create_event(&db, "Lab 1", 10).await?;
    let anna = user(100, Some("Anna"), None);

    QueueEntry::register(&db.pool, event.id, 4, &anna).await?;
    let outcome = QueueEntry::register(&db.pool, event.id, 5, &anna).await?;
    assert_eq!(outcome, RegistrationOutcome::AlreadyRegistered { position: 4 });

    // Another event is independent
    let other = create_event(&db, "Lab 2", 10).await?;
    let outcome = QueueEntry::register(&db.pool, other.id, 4, &anna).await?;
    assert!(outcome.is_registered());

    Ok(())
}

#[tokio::test]
async fn test_register_out_of_range_and_missing_event() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let event = create_event(&db, "Lab 1", 5).await?;
    let anna = user(100, Some("Anna"), None);

    for position in [0, -1, 6] {
        let outcome = QueueEntry::register(&db.pool, event.id, position, &anna).await?;
        assert_eq!(outcome, RegistrationOutcome::OutOfRange { max: 5 });
    }

    let outcome = QueueEntry::register(&db.pool, event.id, 5, &anna).await?;
    assert!(outcome.is_registered());

    let outcome = QueueEntry::register(&db.pool, 9999, 1, &anna).await?;
    assert_eq!(outcome, RegistrationOutcome::EventNotFound);

    Ok(())
}

#[tokio::test]
async fn test_cancel_registration_frees_position() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let event = create_event(&db, "Lab 1", 10).await?;

    QueueEntry::register(&db.pool, event.id, 1, &user(100, Some("Anna"), None)).await?;

    assert!(QueueEntry::cancel(&db.pool, event.id, 100).await?);
    assert!(!QueueEntry::cancel(&db.pool, event.id, 100).await?);
    assert!(QueueEntry::find_for_user(&db.pool, event.id, 100).await?.is_none());

    let outcome = QueueEntry::register(&db.pool, event.id, 1, &user(200, Some("Bob"), None)).await?;
    assert!(outcome.is_registered());

    Ok(())
}

#[tokio::test]
async fn test_delete_event_cascades_to_queue() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let event = create_event(&db, "Lab 1", 10).await?;
    let kept = create_event(&db, "Lab 2", 10).await?;

    QueueEntry::register(&db.pool, event.id, 1, &user(100, Some("Anna"), None)).await?;
    QueueEntry::register(&db.pool, event.id, 2, &user(101, Some("Bob"), None)).await?;
    QueueEntry::register(&db.pool, kept.id, 1, &user(100, Some("Anna"), None)).await?;

    assert!(Event::delete(&db.pool, event.id).await?);
    assert!(Event::find_by_id(&db.pool, event.id).await?.is_none());
    assert!(QueueEntry::find_by_event(&db.pool, event.id).await?.is_empty());
    assert_eq!(QueueEntry::find_by_event(&db.pool, kept.id).await?.len(), 1);

    assert!(!Event::delete(&db.pool, event.id).await?);

    Ok(())
}

#[tokio::test]
async fn test_queue_is_ordered_by_position() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let event = create_event(&db, "Lab 1", 10).await?;

    for (user_id, position) in [(100, 7), (101, 2), (102, 5)] {
        assert_ok!(QueueEntry::register(&db.pool, event.id, position, &user(user_id, None, None)).await);
    }

    let positions: Vec<i64> = QueueEntry::find_by_event(&db.pool, event.id)
        .await?
        .iter()
        .map(|e| e.position)
        .collect();
    assert_eq!(positions, vec![2, 5, 7]);
    assert_eq!(available_positions(event.max_positions, &positions)[0], 1);

    Ok(())
}

#[tokio::test]
async fn test_overview_groups_queues_by_event() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let physics = create_event(&db, "Physics", 3).await?;
    let algebra = create_event(&db, "Algebra", 5).await?;

    QueueEntry::register(&db.pool, physics.id, 2, &user(100, Some("Anna"), None)).await?;
    QueueEntry::register(&db.pool, physics.id, 1, &user(101, Some("Bob"), None)).await?;

    let overview = assert_ok!(EventOverview::load_all(&db.pool).await);
    assert_eq!(overview.len(), 2);

    assert_eq!(overview[0].event.id, algebra.id);
    assert_eq!(overview[0].taken, 0);
    assert!(overview[0].queue.is_empty());

    assert_eq!(overview[1].event.id, physics.id);
    assert_eq!(overview[1].taken, 2);
    let names: Vec<&str> = overview[1].queue.iter().map(|e| e.display_name()).collect();
    assert_eq!(names, vec!["Bob", "Anna"]);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_for_one_position() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let event_id = create_event(&db, "Lab 1", 20).await?.id;

    for round in 0..10_i64 {
        let position = round + 1;
        let tasks: Vec<_> = (0..8_i64)
            .map(|i| {
                let pool = db.pool.clone();
                let claimant = user(round * 100 + i, Some("Racer"), None);
                tokio::spawn(async move {
                    QueueEntry::register(&pool, event_id, position, &claimant).await
                })
            })
            .collect();

        let mut registered = 0;
        for task in tasks {
            match task.await?? {
                RegistrationOutcome::Registered { .. } => registered += 1,
                RegistrationOutcome::PositionTaken { .. } | RegistrationOutcome::Conflict => {}
                other => panic!("unexpected outcome {other:?}"),
            }
        }
        assert_eq!(registered, 1, "position {position}");
    }

    assert_eq!(QueueEntry::find_by_event(&db.pool, event_id).await?.len(), 10);

    Ok(())
}

#[tokio::test]
async fn test_register_own_position_again_reports_it_taken() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let event = create_event(&db, "Lab 1", 10).await?;
    let anna = user(100, Some("Anna"), None);

    QueueEntry::register(&db.pool, event.id, 2, &anna).await?;
    let outcome = QueueEntry::register(&db.pool, event.id, 2, &anna).await?;
    assert_eq!(
        outcome,
        RegistrationOutcome::PositionTaken { position: 2, holder: "Anna".to_string() }
    );

    Ok(())
}

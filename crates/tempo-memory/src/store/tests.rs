use super::{EntryKind, Store};
use chrono::{Duration, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Create an in-memory store for testing.
async fn test_store() -> Store {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .unwrap();
    Store::run_migrations(&pool).await.unwrap();
    Store { pool }
}

#[tokio::test]
async fn test_insert_and_query_future() {
    let store = test_store().await;
    let now = Utc::now();

    let id = store
        .insert_entry(
            EntryKind::Timer,
            "10 minutes",
            "assistant/livingroom/output",
            now + Duration::minutes(10),
        )
        .await
        .unwrap();
    assert!(id > 0);

    let entries = store.future_entries(now).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, EntryKind::Timer);
    assert_eq!(entries[0].name, "10 minutes");
    assert_eq!(entries[0].output_topic, "assistant/livingroom/output");
}

#[tokio::test]
async fn test_future_excludes_past_entries() {
    let store = test_store().await;
    let now = Utc::now();

    store
        .insert_entry(
            EntryKind::Timer,
            "expired",
            "topic",
            now - Duration::minutes(5),
        )
        .await
        .unwrap();
    store
        .insert_entry(
            EntryKind::Alarm,
            "7 o'clock",
            "topic",
            now + Duration::hours(2),
        )
        .await
        .unwrap();

    let entries = store.future_entries(now).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "7 o'clock");
    assert_eq!(entries[0].kind, EntryKind::Alarm);
}

#[tokio::test]
async fn test_future_entries_ascending_order() {
    let store = test_store().await;
    let now = Utc::now();

    store
        .insert_entry(EntryKind::Timer, "later", "topic", now + Duration::hours(3))
        .await
        .unwrap();
    store
        .insert_entry(
            EntryKind::Timer,
            "sooner",
            "topic",
            now + Duration::minutes(1),
        )
        .await
        .unwrap();

    let entries = store.future_entries(now).await.unwrap();
    assert_eq!(entries[0].name, "sooner");
    assert_eq!(entries[1].name, "later");
}

#[tokio::test]
async fn test_remove_entry() {
    let store = test_store().await;
    let now = Utc::now();

    store
        .insert_entry(
            EntryKind::Timer,
            "5 minutes",
            "topic",
            now + Duration::minutes(5),
        )
        .await
        .unwrap();

    let removed = store.remove_entry(EntryKind::Timer, "5 minutes").await.unwrap();
    assert_eq!(removed, 1);
    assert!(store.future_entries(now).await.unwrap().is_empty());

    // Absent entries are a no-op.
    let removed = store.remove_entry(EntryKind::Timer, "5 minutes").await.unwrap();
    assert_eq!(removed, 0);
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let store = test_store().await;
    Store::run_migrations(&store.pool).await.unwrap();
    Store::run_migrations(&store.pool).await.unwrap();
}

//! Integration tests for visit counting through the HTTP surface

mod common;

use axum::http::StatusCode;
use common::{build_app, get, state_with_visits_file, visit_count};
use moscow_time::visits::VisitStore;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_three_visits_are_counted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("visits");
    let app = build_app(state_with_visits_file(&path));

    for _ in 0..3 {
        assert_eq!(get(&app, "/").await.status(), StatusCode::OK);
    }

    assert_eq!(visit_count(&app).await, 3);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "3");
}

#[tokio::test]
async fn test_count_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("visits");

    let first = build_app(state_with_visits_file(&path));
    get(&first, "/").await;
    get(&first, "/").await;
    drop(first);

    let second = build_app(state_with_visits_file(&path));
    get(&second, "/").await;

    assert_eq!(visit_count(&second).await, 3);
}

#[tokio::test]
async fn test_missing_directory_is_created_on_first_visit() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("not").join("yet").join("visits");
    let app = build_app(state_with_visits_file(&path));

    assert_eq!(get(&app, "/").await.status(), StatusCode::OK);

    assert!(path.exists());
    assert_eq!(visit_count(&app).await, 1);
}

#[tokio::test]
async fn test_uncreatable_directory_does_not_fail_requests() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "regular file").unwrap();
    let state = state_with_visits_file(&blocker.join("visits"));
    let metrics = state.metrics().clone();
    let app = build_app(state);

    assert_eq!(get(&app, "/").await.status(), StatusCode::OK);
    assert_eq!(visit_count(&app).await, 0);
    assert!(metrics.visit_store_failures_count() > 0);
}

#[tokio::test]
async fn test_corrupted_file_restarts_count() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("visits");
    std::fs::write(&path, "twelve").unwrap();
    let app = build_app(state_with_visits_file(&path));

    assert_eq!(visit_count(&app).await, 0);
    get(&app, "/").await;
    assert_eq!(visit_count(&app).await, 1);
}

#[tokio::test]
async fn test_concurrent_visits_are_all_counted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("visits");
    std::fs::write(&path, "100").unwrap();
    let app = build_app(state_with_visits_file(&path));

    let handles: Vec<_> = (0..25)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move { get(&app, "/").await.status() })
        })
        .collect();

    for result in futures::future::join_all(handles).await {
        assert_eq!(result.unwrap(), StatusCode::OK);
    }

    assert_eq!(visit_count(&app).await, 125);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_store_increments_lose_no_updates() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(VisitStore::new(dir.path().join("visits")));

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.increment().await })
        })
        .collect();

    let mut returned: Vec<u64> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();
    returned.sort_unstable();

    assert_eq!(returned, (1..=50).collect::<Vec<u64>>());
    assert_eq!(store.load().await, 50);
}

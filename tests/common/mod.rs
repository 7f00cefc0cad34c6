//! Shared helpers for integration tests

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use moscow_time::{app, config::Config, handlers::AppState};
use std::path::Path;
use tower::ServiceExt; // for `oneshot`

/// State whose visit counter lives at `visits_file`
pub fn state_with_visits_file(visits_file: &Path) -> AppState {
    let mut config = Config::default();
    config.storage.visits_file = visits_file.to_path_buf();
    AppState::new(&config).expect("should create AppState")
}

/// Send a GET request through a clone of `app`
pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Collect a response body as UTF-8 text
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

/// Full application for `state`
pub fn build_app(state: AppState) -> Router {
    app::build(state)
}

/// Read `visit_count` from a `/visits` response
pub async fn visit_count(app: &Router) -> u64 {
    let response = get(app, "/visits").await;
    assert_eq!(response.status(), 200);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    json["visit_count"]
        .as_u64()
        .expect("visit_count should be a non-negative integer")
}

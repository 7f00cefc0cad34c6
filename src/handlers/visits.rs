//! Visit count endpoint

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::handlers::AppState;

/// Visit count response
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisitsResponse {
    pub visit_count: u64,
}

/// Returns the persisted visit count (0 if the store is unreadable)
pub async fn handler(State(state): State<AppState>) -> Json<VisitsResponse> {
    let visit_count = state.visits().load().await;
    Json(VisitsResponse { visit_count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_visits_handler_reports_persisted_count() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.visits_file = dir.path().join("visits");
        let state = AppState::new(&config).unwrap();

        state.visits().save(12).await;

        let Json(body) = handler(State(state)).await;
        assert_eq!(body, VisitsResponse { visit_count: 12 });
    }

    #[test]
    fn test_response_serializes_with_expected_key() {
        let json = serde_json::to_string(&VisitsResponse { visit_count: 3 }).unwrap();
        assert_eq!(json, r#"{"visit_count":3}"#);
    }
}

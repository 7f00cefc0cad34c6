//! Prometheus metrics endpoint
//!
//! Exposes metrics in Prometheus text format for scraping.

use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};

use crate::error::AppResult;
use crate::handlers::AppState;

/// Metrics handler for Prometheus scraping
///
/// # Response
///
/// - `200 OK` with metrics in Prometheus text format
/// - `500 Internal Server Error` if metrics encoding fails
///
/// # Example
///
/// ```bash
/// curl http://localhost:8000/metrics
/// # HELP request_count App Request Count
/// # TYPE request_count counter
/// request_count{app_name="moscow_time",endpoint="/",http_status="200",method="GET"} 42
/// ```
pub async fn handler(State(state): State<AppState>) -> AppResult<Response> {
    let body = state.metrics().export().inspect_err(|e| {
        tracing::error!(error = %e, "Failed to export metrics for Prometheus scraping");
    })?;

    Ok(([(CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_metrics_handler_returns_prometheus_format() {
        let state = AppState::new(&Config::default()).unwrap();
        state.metrics().record("GET", "/", 200, 0.01).unwrap();

        let response = handler(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            prometheus::TEXT_FORMAT
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("# HELP request_count"));
        assert!(body.contains("# TYPE request_latency_seconds histogram"));
    }

    #[tokio::test]
    async fn test_metrics_handler_with_empty_registry() {
        let state = AppState::new(&Config::default()).unwrap();

        let response = handler(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK, "Should succeed with empty registry");
    }
}

//! Route table and interceptor chain

use axum::{Router, routing::get};

use crate::handlers::{self, AppState};
use crate::middleware;

/// Routes without interceptors or state
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::index::handler))
        .route("/visits", get(handlers::visits::handler))
        .route("/metrics", get(handlers::metrics::handler))
        .route("/health", get(handlers::health::handler))
}

/// The complete application: routes wrapped in the interceptor chain
pub fn build(state: AppState) -> Router {
    middleware::apply_chain(routes(), state.metrics().clone()).with_state(state)
}

//! Request interceptor chain
//!
//! Every request passes through, outermost first:
//!
//! 1. [`metrics::track_metrics`]: times the whole downstream call and records
//!    the final status in the [`Metrics`] registry.
//! 2. [`request_log::log_request`]: assigns a request ID and logs method,
//!    URL and client host.
//! 3. `CatchPanicLayer`: turns a panicking handler into a `500`.
//!
//! The panic mapper sits inside both interceptors, so a handler fault is
//! still logged and recorded as a `500` instead of unwinding past them.

use axum::{Router, middleware::from_fn, middleware::from_fn_with_state};
use tower_http::catch_panic::CatchPanicLayer;

use crate::metrics::Metrics;

pub mod metrics;
pub mod request_log;

/// Wrap every route of `router` (including the fallback) in the chain
pub fn apply_chain<S>(router: Router<S>, registry: Metrics) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // Router::layer wraps existing layers, so the last one added is outermost
    router
        .layer(CatchPanicLayer::new())
        .layer(from_fn(request_log::log_request))
        .layer(from_fn_with_state(registry, metrics::track_metrics))
}

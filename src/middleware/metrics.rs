//! Metrics interceptor

use axum::{
    extract::{MatchedPath, Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::metrics::Metrics;

/// Endpoint label for requests no route matched
pub const UNMATCHED_ENDPOINT: &str = "unmatched";

/// Method label for anything outside the standard HTTP methods
pub const OTHER_METHOD: &str = "other";

/// Endpoint label for a request
///
/// Uses the matched route template when the router found one. Unmatched
/// requests all share [`UNMATCHED_ENDPOINT`] so arbitrary paths cannot grow
/// the label set.
pub fn endpoint_label(request: &Request) -> &str {
    request
        .extensions()
        .get::<MatchedPath>()
        .map_or(UNMATCHED_ENDPOINT, MatchedPath::as_str)
}

/// Method label for a request
///
/// Bounded to the nine standard methods plus [`OTHER_METHOD`]; extension
/// methods are client-chosen strings.
pub fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::HEAD => "HEAD",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::CONNECT => "CONNECT",
        Method::OPTIONS => "OPTIONS",
        Method::TRACE => "TRACE",
        Method::PATCH => "PATCH",
        _ => OTHER_METHOD,
    }
}

/// Middleware that records one request sample per completed request
///
/// The timer brackets the continuation, so the latency covers everything
/// downstream: inner interceptors, the handler and any panic mapping.
pub async fn track_metrics(
    State(metrics): State<Metrics>,
    request: Request,
    next: Next,
) -> Response {
    let method = method_label(request.method());
    let endpoint = endpoint_label(&request).to_owned();

    let start = Instant::now();
    let response = next.run(request).await;
    let latency_seconds = start.elapsed().as_secs_f64();

    let status = response.status().as_u16();
    if let Err(e) = metrics.record(method, &endpoint, status, latency_seconds) {
        tracing::warn!(
            error = %e,
            method,
            endpoint = %endpoint,
            status,
            "Failed to record request metrics"
        );
        metrics.metrics_recording_failure("record_request");
    }

    response
}

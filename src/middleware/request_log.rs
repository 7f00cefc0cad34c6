//! Request logging interceptor
//!
//! Generates a unique UUID for each incoming request, logs the request and
//! echoes the ID back in a response header.

use axum::{
    extract::{ConnectInfo, Request},
    http::{HeaderValue, header::HOST},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use uuid::Uuid;

/// Request ID header name
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-request correlation ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

impl RequestId {
    /// Generate a new random request ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Peer IP of the connection, or `unknown` when the server was not started
/// with connect info (in-process tests, for one)
pub fn client_host(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Absolute URL of the request as the client addressed it
pub fn full_url(request: &Request) -> String {
    let uri = request.uri();
    if uri.scheme().is_some() {
        return uri.to_string();
    }

    match request.headers().get(HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => format!("http://{}{}", host, uri),
        None => uri.to_string(),
    }
}

/// Middleware that logs each request and tags it with a request ID
///
/// The request ID is:
/// 1. Generated as a UUID v4
/// 2. Logged with the request line
/// 3. Added to the response headers for client correlation
pub async fn log_request(request: Request, next: Next) -> Response {
    let request_id = RequestId::new();

    tracing::info!(
        request_id = %request_id,
        method = %request.method(),
        url = %full_url(&request),
        client_host = %client_host(&request),
        "Incoming request"
    );

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&request_id.to_string()) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER, header_value);
    }

    response
}

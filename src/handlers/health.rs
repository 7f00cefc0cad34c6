//! Health check endpoint
//!
//! Liveness only: no dependency is consulted, so the answer does not change
//! when the visit store or metrics are degraded.

/// Health check handler
///
/// Always returns 200 OK with the body `OK`.
pub async fn handler() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_handler_returns_ok() {
        assert_eq!(handler().await, "OK");
    }
}

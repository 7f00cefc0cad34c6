//! Graceful shutdown trigger

use std::future::Future;
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Future that resolves on ctrl-c or, on Unix, SIGTERM
///
/// Container runtimes stop services with SIGTERM. The SIGTERM handler is
/// installed when this is called rather than on first poll, so a signal
/// arriving in between is not lost. Must be called inside a Tokio runtime.
pub fn shutdown_signal() -> impl Future<Output = ()> {
    #[cfg(unix)]
    let sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => Some(sigterm),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for SIGTERM");
            None
        }
    };

    async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async move {
            match sigterm {
                Some(mut sigterm) => {
                    sigterm.recv().await;
                }
                None => std::future::pending::<()>().await,
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }

        tracing::info!("Shutdown signal received, draining connections");
    }
}

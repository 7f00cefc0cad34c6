//! HTTP request handlers for the moscow-time API

use crate::config::Config;
use crate::error::AppResult;
use crate::metrics::Metrics;
use crate::visits::VisitStore;
use std::sync::Arc;

pub mod health;
pub mod index;
pub mod metrics;
pub mod visits;

/// Application state shared across all handlers
///
/// Contains the metrics registry and the visit store.
/// All fields are cheap to clone across Axum handlers.
#[derive(Clone)]
pub struct AppState {
    metrics: Metrics,
    visits: Arc<VisitStore>,
}

impl AppState {
    /// Create a new AppState from configuration
    ///
    /// Builds a fresh metrics registry labeled with `app.name` and a visit
    /// store at `storage.visits_file` that reports failures to it.
    pub fn new(config: &Config) -> AppResult<Self> {
        let metrics = Metrics::new(&config.app.name)?;
        let visits =
            VisitStore::new(config.storage.visits_file.clone()).with_metrics(metrics.clone());

        Ok(Self {
            metrics,
            visits: Arc::new(visits),
        })
    }

    /// Get reference to the metrics registry
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Get reference to the visit store
    pub fn visits(&self) -> &VisitStore {
        &self.visits
    }
}

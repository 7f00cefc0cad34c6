//! Prometheus metrics collection for moscow-time
//!
//! This module provides metrics instrumentation for tracking:
//! - Request counts by method, endpoint and status
//! - Request latency by endpoint
//! - Fail-open persistence failures of the visit store
//!
//! Metrics are exposed via the `/metrics` endpoint in Prometheus text format.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Request counter metric name
pub const REQUEST_COUNT: &str = "request_count";

/// Request latency histogram metric name
pub const REQUEST_LATENCY_SECONDS: &str = "request_latency_seconds";

/// Visit store failure counter metric name
pub const VISIT_STORE_FAILURES_TOTAL: &str = "visit_store_failures_total";

/// Metrics recording failure counter metric name
pub const METRICS_RECORDING_FAILURES_TOTAL: &str = "metrics_recording_failures_total";

/// Metrics collector for moscow-time
///
/// Each instance owns its own registry, so separate instances never share
/// state. Clones share the same registry.
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    app_name: Arc<str>,
    request_count: IntCounterVec,
    request_latency: HistogramVec,
    visit_store_failures: IntCounterVec,
    metrics_recording_failures: IntCounterVec,
}

impl Metrics {
    /// Create a new Metrics instance
    ///
    /// `app_name` is stamped on every request sample as the `app_name` label.
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new(app_name: &str) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Cardinality: 10 methods × (routes + "unmatched") × statuses; the
        // interceptor collapses unmatched paths and extension methods
        let request_count = IntCounterVec::new(
            Opts::new(REQUEST_COUNT, "App Request Count"),
            &["app_name", "method", "endpoint", "http_status"],
        )?;

        let request_latency = HistogramVec::new(
            HistogramOpts::new(REQUEST_LATENCY_SECONDS, "Request latency in seconds")
                .buckets(prometheus::DEFAULT_BUCKETS.to_vec()),
            &["app_name", "endpoint"],
        )?;

        // Labels:
        // - operation: "load" or "save"
        //
        // Nonzero means visitors are being served a degraded count.
        let visit_store_failures = IntCounterVec::new(
            Opts::new(
                VISIT_STORE_FAILURES_TOTAL,
                "Total number of visit counter persistence failures by operation. \
                Failures never reach clients; the counter falls back to zero on load \
                and drops the write on save.",
            ),
            &["operation"],
        )?;

        let metrics_recording_failures = IntCounterVec::new(
            Opts::new(
                METRICS_RECORDING_FAILURES_TOTAL,
                "Total number of request samples that could not be recorded, by operation.",
            ),
            &["operation"],
        )?;

        registry.register(Box::new(request_count.clone()))?;
        registry.register(Box::new(request_latency.clone()))?;
        registry.register(Box::new(visit_store_failures.clone()))?;
        registry.register(Box::new(metrics_recording_failures.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            app_name: Arc::from(app_name),
            request_count,
            request_latency,
            visit_store_failures,
            metrics_recording_failures,
        })
    }

    /// The `app_name` label value
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Record one completed request
    ///
    /// Increments `request_count{app_name, method, endpoint, http_status}` and
    /// observes `latency_seconds` in `request_latency_seconds{app_name, endpoint}`.
    ///
    /// # Errors
    ///
    /// Returns an error if `latency_seconds` is NaN, infinite or negative.
    /// Validation runs before either aggregate is touched, so a rejected
    /// sample leaves both untouched.
    pub fn record(
        &self,
        method: &str,
        endpoint: &str,
        status_code: u16,
        latency_seconds: f64,
    ) -> Result<(), prometheus::Error> {
        if !latency_seconds.is_finite() {
            return Err(prometheus::Error::Msg(format!(
                "Histogram value must be finite (not NaN or Infinity), got: {}",
                latency_seconds
            )));
        }

        if latency_seconds < 0.0 {
            return Err(prometheus::Error::Msg(format!(
                "Histogram value must be non-negative (latency cannot be negative), got: {}",
                latency_seconds
            )));
        }

        let status = status_code.to_string();
        let app_name: &str = &self.app_name;

        let counter = self
            .request_count
            .get_metric_with_label_values(&[app_name, method, endpoint, status.as_str()])?;
        let histogram = self
            .request_latency
            .get_metric_with_label_values(&[app_name, endpoint])?;

        counter.inc();
        histogram.observe(latency_seconds);
        Ok(())
    }

    /// Record a visit store failure for `operation` ("load" or "save")
    pub fn visit_store_failure(&self, operation: &str) {
        self.visit_store_failures
            .with_label_values(&[operation])
            .inc();
    }

    /// Record a failure to record a request sample
    pub fn metrics_recording_failure(&self, operation: &str) {
        self.metrics_recording_failures
            .with_label_values(&[operation])
            .inc();
    }

    /// Current value of `request_count` for one label combination
    ///
    /// Reads a gathered snapshot, so asking about a combination that was
    /// never recorded does not create it.
    pub fn request_count(&self, method: &str, endpoint: &str, status_code: u16) -> u64 {
        let status = status_code.to_string();
        let wanted = [
            ("app_name", self.app_name()),
            ("method", method),
            ("endpoint", endpoint),
            ("http_status", status.as_str()),
        ];

        self.registry
            .gather()
            .iter()
            .find(|mf| mf.name() == REQUEST_COUNT)
            .and_then(|mf| {
                mf.get_metric()
                    .iter()
                    .find(|m| labels_match(m, &wanted))
                    .map(|m| m.counter.value.unwrap_or(0.0) as u64)
            })
            .unwrap_or(0)
    }

    /// Number of latency observations recorded for `endpoint`
    pub fn latency_sample_count(&self, endpoint: &str) -> u64 {
        self.latency_snapshot(endpoint).map_or(0, |(count, _)| count)
    }

    /// Sum of latency observations recorded for `endpoint`, in seconds
    pub fn latency_sample_sum(&self, endpoint: &str) -> f64 {
        self.latency_snapshot(endpoint).map_or(0.0, |(_, sum)| sum)
    }

    fn latency_snapshot(&self, endpoint: &str) -> Option<(u64, f64)> {
        let wanted = [("app_name", self.app_name()), ("endpoint", endpoint)];

        self.registry
            .gather()
            .iter()
            .find(|mf| mf.name() == REQUEST_LATENCY_SECONDS)
            .and_then(|mf| {
                mf.get_metric()
                    .iter()
                    .find(|m| labels_match(m, &wanted))
                    .map(|m| {
                        (
                            m.histogram.sample_count.unwrap_or(0),
                            m.histogram.sample_sum.unwrap_or(0.0),
                        )
                    })
            })
    }

    /// Total visit store failures across all operations
    pub fn visit_store_failures_count(&self) -> u64 {
        self.registry
            .gather()
            .iter()
            .find(|mf| mf.name() == VISIT_STORE_FAILURES_TOTAL)
            .map(|mf| {
                mf.get_metric()
                    .iter()
                    .map(|m| m.counter.value.unwrap_or(0.0) as u64)
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Gather all metrics and encode them in Prometheus text format
    ///
    /// # Errors
    ///
    /// Returns an error if metric encoding fails.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let metric_families = self.registry.gather();
        let metric_count = metric_families.len();

        tracing::debug!(
            metric_family_count = metric_count,
            "Encoding metrics to Prometheus text format"
        );

        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();

        encoder.encode(&metric_families, &mut buffer).map_err(|e| {
            tracing::error!(
                error = %e,
                metric_family_count = metric_count,
                "Prometheus text encoder failed"
            );
            e
        })?;

        String::from_utf8(buffer).map_err(|e| {
            prometheus::Error::Msg(format!(
                "Failed to convert metrics to UTF-8 at byte {}: {}",
                e.utf8_error().valid_up_to(),
                e
            ))
        })
    }
}

fn labels_match(metric: &prometheus::proto::Metric, wanted: &[(&str, &str)]) -> bool {
    wanted.iter().all(|(name, value)| {
        metric
            .label
            .iter()
            .any(|pair| pair.name() == *name && pair.value() == *value)
    })
}

//! moscow-time - Moscow clock web service
//!
//! Renders the current time in `Europe/Moscow`, keeps a file-backed visit
//! counter and exposes request metrics in Prometheus format.

pub mod app;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod shutdown;
pub mod telemetry;
pub mod visits;

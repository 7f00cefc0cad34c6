//! Command-line interface for moscow-time
//!
//! Provides argument parsing and subcommand handling for the binary.

use clap::{Parser, Subcommand};

/// Moscow clock web service
#[derive(Parser)]
#[command(name = "moscow-time")]
#[command(version)]
#[command(about = "Moscow clock web service with request metrics and a visit counter")]
pub struct Cli {
    /// Path to configuration file (built-in defaults when omitted)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# moscow-time Configuration
# ==========================
#
# Every key is optional; the values below are the built-in defaults.

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "0.0.0.0"

# Port to listen on
port = 8000

[app]
# Value of the app_name label on request_count and request_latency_seconds
name = "moscow_time"

[storage]
# File holding the visit counter. The VISITS_FILE environment variable
# overrides this value.
visits_file = "/data/visits"

[observability]
# Log level: "trace", "debug", "info", "warn", "error"
# Can be overridden with the RUST_LOG environment variable
log_level = "info"
"#
}

//! moscow-time HTTP server
//!
//! Starts an Axum web server that renders Moscow time and exports request
//! metrics.

use clap::Parser;
use moscow_time::{
    app,
    cli::{Cli, Command, generate_config_template},
    config::{Config, VISITS_FILE_ENV},
    handlers::AppState,
    shutdown::shutdown_signal,
    telemetry,
};
use std::net::SocketAddr;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::Config { output }) = cli.command {
        let template = generate_config_template();
        match output {
            Some(path) => {
                std::fs::write(&path, template)?;
                eprintln!("Wrote configuration template to {}", path);
            }
            None => print!("{}", template),
        }
        return Ok(());
    }

    // Load configuration
    let mut config = Config::load(cli.config.as_deref().map(Path::new))?;
    config.apply_visits_file_override(std::env::var(VISITS_FILE_ENV).ok());

    // Initialize telemetry
    telemetry::init(&config.observability.log_level);

    tracing::info!(
        "Starting moscow-time server on {}:{}",
        config.server.host,
        config.server.port
    );
    tracing::info!(
        visits_file = %config.storage.visits_file.display(),
        app_name = %config.app.name,
        "Visit counter and metrics configured"
    );

    // Create socket address
    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .unwrap_or_else(|_| std::net::IpAddr::from([0, 0, 0, 0])),
        config.server.port,
    ));

    let state = AppState::new(&config)?;
    let app = app::build(state);

    tracing::info!("Listening on {}", addr);
    tracing::info!("Metrics available at http://{}/metrics", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

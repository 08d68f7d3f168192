//! sonascore - Main entry point
//!
//! HTTP service that accepts an uploaded audio file on `POST /analyze/`,
//! runs the feature-extraction pipeline, and returns six 0-100 scores as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sonascore::config::{Config, TomlConfig};

/// Command-line arguments for sonascore
#[derive(Parser, Debug)]
#[command(name = "sonascore")]
#[command(about = "Audio feature-scoring HTTP service")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "SONASCORE_PORT")]
    port: Option<u16>,

    /// Optional TOML configuration file
    #[arg(short, long, env = "SONASCORE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sonascore=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command-line arguments
    let args = Args::parse();

    info!("Starting sonascore v{}", env!("CARGO_PKG_VERSION"));

    // Resolve configuration: CLI > TOML file > defaults
    let toml = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            TomlConfig::load(path).context("Failed to load configuration file")?
        }
        None => TomlConfig::default(),
    };
    let config = Config::resolve(args.port, toml);

    info!("Listening port: {}", config.port);
    info!(
        "Maximum upload size: {} bytes",
        config.max_upload_bytes
    );

    // Run the HTTP server until a shutdown signal arrives
    sonascore::api::server::run(config, shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}

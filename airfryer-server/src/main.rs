//! airfryer-server - Personal air fryer recipe manager
//!
//! Serves the recipe page and keeps the recipe collection in a single JSON
//! document on disk.

use std::path::PathBuf;

use airfryer_common::config::{self, CliOverrides, ServerConfig};
use airfryer_common::{Controller, FileGateway};
use airfryer_server::{build_router, AppState, DOCUMENT_PATH};
use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};

/// Command-line arguments for airfryer-server
#[derive(Parser, Debug)]
#[command(name = "airfryer-server")]
#[command(about = "Personal air fryer recipe manager")]
#[command(version)]
struct Args {
    /// Recipe document (JSON)
    #[arg(short, long, value_name = "FILE")]
    data_file: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Config file (defaults to <config dir>/airfryer/config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting airfryer-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let config_path = args.config.clone().or_else(config::default_config_path);
    let toml_config = config::load_toml_config_or_default(config_path.as_deref());
    let cli = CliOverrides {
        data_file: args.data_file,
        host: args.host,
        port: args.port,
    };
    let config = ServerConfig::resolve(&cli, &toml_config)?;
    info!("Recipe document: {}", config.data_file.display());

    let gateway = FileGateway::new(&config.data_file);
    gateway
        .ensure_exists()
        .await
        .context("Failed to prepare recipe document")?;

    let mut controller = Controller::new(gateway);
    if let Err(e) = controller.reload().await {
        error!("Failed to load recipes: {}", e);
        return Err(e.into());
    }

    let state = AppState::new(controller);
    let app = build_router(state);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_address))?;

    info!("airfryer-server listening on http://{}", bind_address);
    info!("- Local: http://localhost:{}", config.port);
    info!("- Document: http://localhost:{}{}", config.port, DOCUMENT_PATH);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

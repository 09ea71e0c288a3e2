//! Annemo Ingest (annemo-ingest) - Main entry point
//!
//! Loads the subject/content registry, opens the results directory and
//! serves the annotation ingestion API. A registry that fails to load aborts
//! startup with a non-zero exit status.

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use annemo_common::config::{KeyLayout, Settings, SettingsOverrides};
use annemo_common::Registry;
use annemo_ingest::{build_router, AppState};
use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for annemo-ingest
#[derive(Parser, Debug)]
#[command(name = "annemo-ingest")]
#[command(about = "Annotation ingestion service for Annemo")]
#[command(version)]
struct Args {
    /// Settings file (TOML)
    #[arg(short, long, env = "ANNEMO_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "ANNEMO_BIND")]
    bind: Option<IpAddr>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Registry document listing location, videos and users
    #[arg(long, env = "ANNEMO_REGISTRY")]
    registry: Option<PathBuf>,

    /// Directory receiving the CSV logs
    #[arg(short, long, env = "ANNEMO_RESULTS_DIR")]
    results_dir: Option<PathBuf>,

    /// Log file layout: per-stream or per-subject
    #[arg(long, env = "ANNEMO_KEY_LAYOUT")]
    key_layout: Option<KeyLayout>,

    /// fsync every appended record
    #[arg(long, env = "ANNEMO_SYNC_WRITES")]
    sync_writes: Option<bool>,

    /// Default log level when RUST_LOG is unset
    #[arg(long, env = "ANNEMO_LOG_LEVEL")]
    log_level: Option<String>,
}

impl From<Args> for SettingsOverrides {
    fn from(args: Args) -> Self {
        Self {
            config_file: args.config,
            bind: args.bind,
            port: args.port,
            registry: args.registry,
            results_dir: args.results_dir,
            key_layout: args.key_layout,
            sync_writes: args.sync_writes,
            log_level: args.log_level,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::load(args.into()).context("Failed to load settings")?;

    // Initialize tracing
    let default_filter = format!(
        "annemo_ingest={level},annemo_common={level},tower_http={level}",
        level = settings.log_level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Annemo Ingest (annemo-ingest) v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!("Registry: {}", settings.registry.display());
    info!("Results directory: {}", settings.results_dir.display());
    info!("Key layout: {}", settings.key_layout);

    let registry = Registry::load(&settings.registry).with_context(|| {
        format!("Failed to load registry {}", settings.registry.display())
    })?;
    info!(
        "✓ Registry loaded: {} subjects, {} videos, location {}",
        registry.subject_count(),
        registry.videos().len(),
        registry.location()
    );

    let state = AppState::open(&settings, Arc::new(registry))
        .await
        .context("Failed to open results directory")?;
    let app = build_router(state);

    let addr = settings.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("annemo-ingest listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

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

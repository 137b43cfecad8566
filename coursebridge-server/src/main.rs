//! coursebridge-server - Community course enrollment service
//!
//! Single HTTP service providing the course catalog, seat-gated
//! enrollment, class session provisioning, attendance tracking and
//! notification dispatch. Listens on one port; all state lives in the
//! SQLite database.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use coursebridge_common::db::init_database;
use tokio::signal;
use tracing::info;

use coursebridge_server::config::{Config, ConfigOverrides};
use coursebridge_server::services::auth::HttpAuthProvider;
use coursebridge_server::services::notify::Notifier;
use coursebridge_server::services::rooms::StubChatProvisioner;
use coursebridge_server::{build_router, AppState};

/// Command-line arguments for coursebridge-server
#[derive(Parser, Debug)]
#[command(name = "coursebridge-server")]
#[command(about = "Community course enrollment and attendance service")]
#[command(version)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "coursebridge.toml")]
    config: PathBuf,

    /// Port to listen on
    #[arg(short, long, env = "COURSEBRIDGE_PORT")]
    port: Option<u16>,

    /// Database file override
    #[arg(long)]
    database: Option<PathBuf>,

    /// Data folder override (database defaults to <folder>/coursebridge.db)
    #[arg(long)]
    data_folder: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse arguments and resolve configuration before logging starts so
    // the TOML log level can take effect
    let args = Args::parse();

    let config = Config::load(
        &args.config,
        ConfigOverrides {
            database_path: args.database,
            port: args.port,
            data_folder: args.data_folder,
        },
    )?;

    // Initialize tracing; RUST_LOG wins over the configured level
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Log build identification immediately after tracing init
    info!(
        "Starting CourseBridge server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    info!("Configuration file: {}", args.config.display());
    info!("Database path: {}", config.database_path.display());

    let pool = init_database(&config.database_path).await?;
    info!("Database connection established");

    // Wire the external collaborators
    let auth = Arc::new(
        HttpAuthProvider::new(config.auth.url.clone())
            .context("Failed to create auth provider client")?,
    );
    info!("Auth provider: {}", config.auth.url);

    let chat = Arc::new(StubChatProvisioner::default());

    let notifier = Arc::new(
        Notifier::new(config.notifications.clone())
            .context("Failed to create notification client")?,
    );
    info!(
        "Notification channel: {}",
        notifier.active_channel().to_db_string()
    );

    let state = AppState::new(pool, auth, chat, notifier, config.video.clone());
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);
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

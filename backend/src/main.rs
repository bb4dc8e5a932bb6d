mod cache;
mod config;
mod error;
mod handlers;
mod refresh;
mod routes;
mod scheduler;
mod state;
mod views;
mod workbook;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cache::StatusCache;
use crate::config::AppConfig;
use crate::refresh::RefreshJob;
use crate::routes::create_app;
use crate::scheduler::RefreshScheduler;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleet_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    tracing::info!("Starting fleet availability dashboard");

    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!("Failed to create data directory {}", config.data_dir.display())
    })?;
    tracing::info!("Reading workbooks from {}", config.data_dir.display());

    let job = Arc::new(RefreshJob::new(&config.data_dir, StatusCache::new()));
    let snapshot = job.refresh().await.context("Initial refresh failed")?;
    tracing::info!("Loaded {} workbooks", snapshot.len());

    let scheduler = RefreshScheduler::new(Arc::clone(&job), config.refresh_interval);
    let scheduler_handle = tokio::spawn(scheduler.run());

    let state = AppState::new(job).context("Failed to load page templates")?;
    let app = create_app(state, config.cors_allowed_origins.as_deref());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler_handle.abort();
    tracing::info!("Dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received, stopping...");
}

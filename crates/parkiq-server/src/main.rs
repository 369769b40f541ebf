//! ParkIQ server binary.
//!
//! Wires the durable store, the facility, and the HTTP/`WebSocket` server
//! together and serves until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `parkiq-config.yaml` (or `$PARKIQ_CONFIG`)
//! 3. Open the facility, loading the occupied count from disk
//! 4. Serve the mutation API and observer feed
//! 5. Shut down gracefully on `Ctrl-C`

mod error;

use std::path::PathBuf;

use parkiq_core::config::DEFAULT_CONFIG_PATH;
use parkiq_core::{Facility, JsonFileStore, ParkIqConfig};
use parkiq_observer::AppState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the facility cannot be
/// opened, or the listener cannot bind.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("parkiq-server starting");

    // 2. Load configuration.
    let config_path = std::env::var("PARKIQ_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = ParkIqConfig::load(&config_path)?;
    info!(
        capacity = config.facility.capacity,
        host = %config.server.host,
        port = config.server.port,
        data_path = %config.storage.data_path.display(),
        "Configuration loaded"
    );

    // 3. Open the facility.
    let store = JsonFileStore::new(config.storage.data_path.clone());
    let facility = Facility::open(config.facility.capacity, Box::new(store))?;
    let state = std::sync::Arc::new(AppState::new(facility));

    // 4. Serve until Ctrl-C.
    parkiq_observer::start_server(&config.server, state, shutdown_signal()).await?;

    info!("parkiq-server shutdown complete");
    Ok(())
}

/// Resolve when the process receives `Ctrl-C`.
///
/// If the signal handler cannot be installed the server keeps running
/// until it is killed.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

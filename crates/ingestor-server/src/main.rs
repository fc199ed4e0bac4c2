//! Batch Ingestor Server - Main entry point

use anyhow::Result;
use ingestor_common::logging::init_logging;
use tracing::info;

use ingestor_server::{
    api,
    config::{self, Config},
    storage,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Seed from .env first so LOG_* settings there reach the subscriber
    let log_config = config::load_log_config(None)?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(&log_config)?;

    // Load configuration
    let config = Config::load()?;
    info!(
        service = %config.service_name,
        backend = %config.storage.backend,
        region = %config.storage.region,
        "Starting {} - server will bind to {}:{}",
        config.service_name,
        config.server.host,
        config.server.port
    );

    // Build the storage client once; a missing bucket or table stops startup here
    let store = storage::build_store(&config.storage).await?;

    api::serve(config, store).await
}

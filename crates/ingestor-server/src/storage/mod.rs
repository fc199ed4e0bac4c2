//! Storage backends for ingested items
//!
//! Every backend implements [`ItemStore::store_batch`]: persist an ordered
//! batch and return one backend-specific key per item, in the same order.
//! Batches are not atomic; a failure part-way through leaves the earlier
//! items written.
//!
//! [`build_store`] selects the backend from [`StorageConfig`] and fails at
//! construction time when the backend's bucket or table is missing.

use async_trait::async_trait;
use aws_config::{retry::RetryConfig, BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use ingestor_common::{types::DataItemOut, IngestorError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

pub mod config;
pub mod decimal;
pub mod dynamodb;
pub mod s3;

pub use config::{StorageBackend, StorageConfig};
pub use dynamodb::DynamoDbStore;
pub use s3::S3Store;

/// Errors raised while configuring or writing to a backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("{0}")]
    Configuration(String),

    #[error("S3 storage error: {0}")]
    ObjectStore(String),

    #[error("DynamoDB storage error: {0}")]
    KeyedTable(String),

    #[error("Failed to serialize item: {0}")]
    Serialization(#[from] IngestorError),
}

/// A place ingested items can be written to
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// The backend kind, as reported by `/health`
    fn backend(&self) -> StorageBackend;

    /// Persist `items` in order and return one storage key per item
    async fn store_batch(&self, items: &[DataItemOut]) -> Result<Vec<String>, StorageError>;
}

/// Shared handle to the process-wide store
pub type SharedStore = Arc<dyn ItemStore>;

/// Build the configured backend.
///
/// Called once at startup; the returned client is reused by every request.
pub async fn build_store(config: &StorageConfig) -> Result<SharedStore, StorageError> {
    config.validate()?;

    debug!(backend = %config.backend, region = %config.region, "Initializing storage");

    let sdk_config = load_sdk_config(config).await;

    let store: SharedStore = match config.backend {
        StorageBackend::ObjectStore => Arc::new(S3Store::new(&sdk_config, config)?),
        StorageBackend::KeyedTable => Arc::new(DynamoDbStore::new(&sdk_config, config)?),
    };

    info!(backend = %config.backend, "Storage backend ready");

    Ok(store)
}

/// Shared AWS SDK settings for both backends.
///
/// SDK retries are disabled: a failed write surfaces immediately.
async fn load_sdk_config(config: &StorageConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .retry_config(RetryConfig::disabled());

    if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
        loader = loader.credentials_provider(Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            "ingestor-static",
        ));
    }

    loader.load().await
}

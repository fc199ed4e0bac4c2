//! Object-store backend: one JSON document per item in an S3 bucket

use async_trait::async_trait;
use aws_sdk_s3::{error::DisplayErrorContext, primitives::ByteStream, Client};
use ingestor_common::{datetime::format_iso8601, types::DataItemOut};
use tracing::{debug, error, info, instrument};

use super::{config::StorageConfig, ItemStore, StorageBackend, StorageError};

const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl std::fmt::Debug for S3Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Store")
            .field("bucket", &self.bucket)
            .finish()
    }
}

impl S3Store {
    /// Build the S3 client from the shared SDK configuration
    pub fn new(sdk_config: &aws_config::SdkConfig, config: &StorageConfig) -> Result<Self, StorageError> {
        let bucket = config.require_bucket()?.to_string();

        let mut builder =
            aws_sdk_s3::config::Builder::from(sdk_config).force_path_style(config.path_style);

        if let Some(endpoint) = &config.s3_endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        let client = Client::from_conf(builder.build());

        info!(bucket = %bucket, "S3 storage client initialized");

        Ok(Self { client, bucket })
    }

    /// Create from a pre-built client
    pub fn from_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    #[instrument(skip(self, item), fields(item_id = %item.id))]
    async fn put_item(&self, item: &DataItemOut) -> Result<String, StorageError> {
        let key = object_key(item);
        let body = item.to_json_bytes()?;

        debug!("Uploading {} bytes to s3://{}/{}", body.len(), self.bucket, key);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .content_type(JSON_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                error!(error = %message, key = %key, "Failed to store item to S3");
                StorageError::ObjectStore(message)
            })?;

        info!(key = %key, "Stored item to S3");

        Ok(key)
    }
}

#[async_trait]
impl ItemStore for S3Store {
    fn backend(&self) -> StorageBackend {
        StorageBackend::ObjectStore
    }

    /// Writes items one at a time. The first failure stops the loop;
    /// objects written before it stay in the bucket.
    #[instrument(skip(self, items), fields(bucket = %self.bucket, count = items.len()))]
    async fn store_batch(&self, items: &[DataItemOut]) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::with_capacity(items.len());

        for item in items {
            keys.push(self.put_item(item).await?);
        }

        Ok(keys)
    }
}

/// Object key for an item: `items/{id}-{received_at}.json`
pub fn object_key(item: &DataItemOut) -> String {
    format!("items/{}-{}.json", item.id, format_iso8601(&item.received_at))
}

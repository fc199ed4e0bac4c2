//! Keyed-table backend: one DynamoDB row per item, keyed by `PK`/`SK`

use async_trait::async_trait;
use aws_sdk_dynamodb::{error::DisplayErrorContext, types::AttributeValue, Client};
use ingestor_common::types::DataItemOut;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{error, info, instrument};

use super::{
    config::StorageConfig,
    decimal::{to_attribute_map, to_decimal_tree, TableValue},
    ItemStore, StorageBackend, StorageError,
};

/// Partition key attribute name
pub const PARTITION_KEY: &str = "PK";

/// Sort key attribute name
pub const SORT_KEY: &str = "SK";

#[derive(Clone)]
pub struct DynamoDbStore {
    client: Client,
    table_name: String,
}

impl std::fmt::Debug for DynamoDbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoDbStore")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl DynamoDbStore {
    /// Build the DynamoDB client from the shared SDK configuration
    pub fn new(sdk_config: &aws_config::SdkConfig, config: &StorageConfig) -> Result<Self, StorageError> {
        let table_name = config.require_table()?.to_string();

        let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);

        if let Some(endpoint) = &config.dynamodb_endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        let client = Client::from_conf(builder.build());

        info!(table = %table_name, "DynamoDB storage client initialized");

        Ok(Self { client, table_name })
    }

    /// Create from a pre-built client
    pub fn from_client(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl ItemStore for DynamoDbStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::KeyedTable
    }

    /// Writes one row per item, sequentially. Rows written before a
    /// failure stay in the table.
    #[instrument(skip(self, items), fields(table = %self.table_name, count = items.len()))]
    async fn store_batch(&self, items: &[DataItemOut]) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::with_capacity(items.len());

        for item in items {
            let row = table_row(item)?;
            let key = storage_key(item);

            self.client
                .put_item()
                .table_name(&self.table_name)
                .set_item(Some(row))
                .send()
                .await
                .map_err(|e| {
                    let message = DisplayErrorContext(&e).to_string();
                    error!(error = %message, item_id = %item.id, "Failed to store item to DynamoDB");
                    StorageError::KeyedTable(message)
                })?;

            info!(item_id = %item.id, key = %key, "Stored item to DynamoDB");
            keys.push(key);
        }

        Ok(keys)
    }
}

/// Storage key reported for an item: `PK#{id}#SK#{sk}`
pub fn storage_key(item: &DataItemOut) -> String {
    format!("PK#{}#SK#{}", item.id, item.sk)
}

/// The full serialized item plus `PK`/`SK`, with every float as a decimal
pub fn table_row(item: &DataItemOut) -> Result<HashMap<String, AttributeValue>, StorageError> {
    let Value::Object(mut document) = item.to_json_value()? else {
        return Err(StorageError::KeyedTable(format!(
            "item {} did not serialize to a JSON object",
            item.id
        )));
    };

    document.insert(PARTITION_KEY.to_string(), Value::String(item.id.clone()));
    document.insert(SORT_KEY.to_string(), Value::String(item.sk.clone()));

    match to_decimal_tree(Value::Object(document)) {
        Ok(TableValue::Map(map)) => Ok(to_attribute_map(map)),
        Ok(_) => Err(StorageError::KeyedTable(format!(
            "item {} did not convert to a table row",
            item.id
        ))),
        Err(e) => Err(StorageError::KeyedTable(format!(
            "item {} has a number that cannot be stored as a decimal: {}",
            item.id, e
        ))),
    }
}

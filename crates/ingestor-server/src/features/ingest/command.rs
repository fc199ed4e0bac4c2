//! Ingest batch command
//!
//! Validates a [`DataBatch`], transforms every item in order and hands the
//! whole ordered list to the store in a single `store_batch` call.

use ingestor_common::types::{DataBatch, DataItemOut};
use serde::{Deserialize, Serialize};

use super::transform::{transform_item_with, Clock};
use crate::{error::AppError, storage::ItemStore};

/// Response from ingesting a batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestResponse {
    /// Number of items written
    pub stored: usize,
    /// One storage key per item, in request order
    pub keys: Vec<String>,
}

#[tracing::instrument(skip(store, clock, batch), fields(items = batch.items.len()))]
pub async fn handle(
    store: &dyn ItemStore,
    clock: &dyn Clock,
    batch: DataBatch,
) -> Result<IngestResponse, AppError> {
    batch.validate()?;

    let items: Vec<DataItemOut> = batch
        .items
        .into_iter()
        .map(|item| transform_item_with(item, clock))
        .collect();

    let keys = store.store_batch(&items).await?;

    tracing::info!(
        stored = keys.len(),
        backend = %store.backend(),
        "Batch ingested"
    );

    Ok(IngestResponse {
        stored: keys.len(),
        keys,
    })
}

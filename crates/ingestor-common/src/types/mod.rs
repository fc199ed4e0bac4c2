//! Common types used across the ingestor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::datetime::{iso8601, iso8601_option};
use crate::error::{IngestorError, Result};

/// Free-form JSON object attached to an item
pub type Metadata = Map<String, Value>;

// ============================================================================
// Inbound Types
// ============================================================================

/// A single item as submitted by a caller.
///
/// # Examples
///
/// ```rust,ignore
/// use ingestor_common::types::DataItemIn;
///
/// let item: DataItemIn = serde_json::from_str(
///     r#"{"id": "test-1", "name": "Test Item", "value": 10.5}"#,
/// )?;
/// assert!(item.timestamp.is_none());
/// assert!(item.metadata.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataItemIn {
    /// Caller-chosen identifier, used as the partition key by the table backend
    pub id: String,

    /// Display name; drives `slug` and `name_upper`
    pub name: String,

    pub value: f64,

    /// Event time supplied by the caller, if any
    #[serde(default, with = "iso8601_option")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default)]
    pub metadata: Metadata,
}

impl DataItemIn {
    /// Checks the constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(IngestorError::Validation("id must not be empty".to_string()));
        }

        if self.name.trim().is_empty() {
            return Err(IngestorError::Validation("name must not be empty".to_string()));
        }

        if !self.value.is_finite() {
            return Err(IngestorError::Validation("value must be a finite number".to_string()));
        }

        Ok(())
    }
}

/// Request envelope for `POST /ingest`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataBatch {
    pub items: Vec<DataItemIn>,
}

impl DataBatch {
    /// Validates the batch shape and every item in it.
    ///
    /// Errors name the offending position so callers can find the bad item.
    pub fn validate(&self) -> Result<()> {
        if self.items.is_empty() {
            return Err(IngestorError::Validation(
                "items must contain at least 1 item".to_string(),
            ));
        }

        for (index, item) in self.items.iter().enumerate() {
            item.validate().map_err(|e| match e {
                IngestorError::Validation(msg) => {
                    IngestorError::Validation(format!("items[{}]: {}", index, msg))
                },
                other => other,
            })?;
        }

        Ok(())
    }
}

// ============================================================================
// Outbound Types
// ============================================================================

/// An item after transformation, ready to be persisted.
///
/// Field order matches the serialized JSON document written to storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataItemOut {
    pub id: String,
    pub name: String,
    pub value: f64,

    /// Caller-supplied event time, or the ingestion clock if absent
    #[serde(with = "iso8601_option")]
    pub timestamp: Option<DateTime<Utc>>,

    pub metadata: Metadata,

    // Derived fields
    pub slug: String,
    pub name_upper: String,
    pub value_times_two: f64,

    #[serde(with = "iso8601")]
    pub received_at: DateTime<Utc>,

    /// Sort key: `received_at` in canonical ISO-8601 form
    pub sk: String,
}

impl DataItemOut {
    /// Serialize to the JSON document stored by the object-store backend
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Serialize to a JSON tree for backends that post-process fields
    pub fn to_json_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

//! Batch Ingestor Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the batch ingestor.
//!
//! # Overview
//!
//! This crate provides functionality used by every workspace member:
//!
//! - **Types**: the inbound/outbound item model and batch envelope
//! - **Datetime**: canonical ISO-8601 rendering and lenient parsing
//! - **Error Handling**: common error and result types
//! - **Logging**: tracing subscriber configuration
//!
//! # Example
//!
//! ```no_run
//! use ingestor_common::types::DataBatch;
//!
//! fn parse(body: &str) -> ingestor_common::Result<DataBatch> {
//!     let batch: DataBatch = serde_json::from_str(body)?;
//!     batch.validate()?;
//!     Ok(batch)
//! }
//! ```

pub mod datetime;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{IngestorError, Result};

//! Batch Ingestor Server Library
//!
//! HTTP service that accepts batches of data items, derives a few computed
//! fields for each one and persists them to S3 or DynamoDB.
//!
//! # Overview
//!
//! - **API Endpoints**: `POST /ingest` and `GET /health`
//! - **Transform**: slug, upper-cased name, doubled value, ingestion time
//! - **Storage Backend**: object store (S3) or keyed table (DynamoDB),
//!   chosen by `STORAGE_BACKEND`
//! - **Configuration**: Environment-based configuration management
//! - **Middleware**: request ids, CORS, request tracing, panic capture
//!
//! # Request Flow
//!
//! 1. The body is parsed into a `DataBatch`; parse and validation failures
//!    become `422 {"detail": ...}`.
//! 2. Each item is transformed, preserving order.
//! 3. The ordered list is written with one `ItemStore::store_batch` call.
//! 4. `201 {"stored": n, "keys": [...]}`, or `500` if storage failed.
//!
//! # Example
//!
//! ```no_run
//! use ingestor_server::{api, config::Config, storage};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let store = storage::build_store(&config.storage).await?;
//!     api::serve(config, store).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod features;
pub mod middleware;
pub mod storage;

// Re-export commonly used types
pub use error::AppError;
pub use features::AppState;

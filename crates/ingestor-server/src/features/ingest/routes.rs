//! Ingest API routes
//!
//! - `POST /ingest` - Validate, transform and store a batch of items

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use ingestor_common::types::DataBatch;

use super::command::{self, IngestResponse};
use crate::{error::AppError, features::AppState};

pub fn ingest_routes() -> Router<AppState> {
    Router::new().route("/ingest", post(ingest_batch))
}

/// Ingest a batch of items
///
/// # Request Body
///
/// ```json
/// {
///   "items": [
///     {"id": "test-1", "name": "Test Item", "value": 10.5, "metadata": {"source": "sensor"}}
///   ]
/// }
/// ```
///
/// # Response
///
/// - `201 Created` - `{"stored": 1, "keys": ["items/test-1-....json"]}`
/// - `422 Unprocessable Entity` - Malformed body or failed validation
/// - `500 Internal Server Error` - Storage failure
async fn ingest_batch(
    State(state): State<AppState>,
    payload: Result<Json<DataBatch>, JsonRejection>,
) -> Result<(StatusCode, Json<IngestResponse>), AppError> {
    let Json(batch) = payload?;

    let response = command::handle(state.store.as_ref(), state.clock.as_ref(), batch).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

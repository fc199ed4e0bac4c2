//! Liveness endpoint
//!
//! `GET /health` reports the active storage backend and region. It does not
//! call the backend.

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::{features::AppState, storage::StorageBackend};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub storage_backend: StorageBackend,
    pub region: String,
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        storage_backend: state.store.backend(),
        region: state.region.to_string(),
    })
}

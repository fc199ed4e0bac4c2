//! Feature modules implementing the ingestor API
//!
//! Each feature is a vertical slice with its own routes and, where there is
//! work to do beyond the HTTP boundary, a command module.
//!
//! # Features
//!
//! - **health**: Liveness and active backend reporting
//! - **ingest**: Batch validation, transformation and storage

pub mod health;
pub mod ingest;

use axum::Router;
use std::sync::Arc;

use crate::storage::SharedStore;
use ingest::{Clock, SystemClock};

/// Shared state for all feature routes
///
/// Read-only after startup; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide storage client
    pub store: SharedStore,
    /// Region reported by `/health`
    pub region: Arc<str>,
    /// Time source for the transform
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(store: SharedStore, region: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            region: region.into(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the transform clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// Creates the router with all feature routes mounted at the root
pub fn router(state: AppState) -> Router<()> {
    Router::new()
        .merge(health::health_routes())
        .merge(ingest::ingest_routes())
        .with_state(state)
}

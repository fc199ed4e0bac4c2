//! Shared helpers for ingestor server integration tests
//!
//! - In-memory `ItemStore` doubles (recording and failing)
//! - Router construction around a given store
//! - One-shot request helpers returning status, headers and JSON body

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use ingestor_common::types::DataItemOut;
use ingestor_server::{
    api::create_router,
    config::CorsConfig,
    features::AppState,
    storage::{ItemStore, SharedStore, StorageBackend, StorageError},
};
use serde_json::Value;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use tower::ServiceExt;

pub const TEST_REGION: &str = "us-east-1";

/// Store double that keeps every item it is given
#[derive(Default)]
pub struct RecordingStore {
    backend: StorageBackend,
    items: Mutex<Vec<DataItemOut>>,
    calls: AtomicUsize,
}

impl RecordingStore {
    pub fn new(backend: StorageBackend) -> Arc<Self> {
        Arc::new(Self {
            backend,
            ..Self::default()
        })
    }

    pub fn items(&self) -> Vec<DataItemOut> {
        self.items.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ItemStore for RecordingStore {
    fn backend(&self) -> StorageBackend {
        self.backend
    }

    async fn store_batch(&self, items: &[DataItemOut]) -> Result<Vec<String>, StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.items.lock().unwrap().extend_from_slice(items);
        Ok(items
            .iter()
            .map(|item| format!("mem/{}/{}", item.id, item.sk))
            .collect())
    }
}

/// Store double that rejects every batch
pub struct FailingStore;

#[async_trait]
impl ItemStore for FailingStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::ObjectStore
    }

    async fn store_batch(&self, _items: &[DataItemOut]) -> Result<Vec<String>, StorageError> {
        Err(StorageError::ObjectStore(
            "NoSuchBucket: The specified bucket does not exist".to_string(),
        ))
    }
}

/// Store double whose handler path panics
pub struct PanickingStore;

#[async_trait]
impl ItemStore for PanickingStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::ObjectStore
    }

    async fn store_batch(&self, _items: &[DataItemOut]) -> Result<Vec<String>, StorageError> {
        panic!("store exploded");
    }
}

pub fn open_cors() -> CorsConfig {
    CorsConfig {
        allowed_origins: vec!["*".to_string()],
        allow_credentials: false,
    }
}

/// Full application router around `store`
pub fn app_with(store: SharedStore, region: &str) -> Router {
    create_router(AppState::new(store, region), &open_cors())
}

pub fn app(store: SharedStore) -> Router {
    app_with(store, TEST_REGION)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn post_ingest(app: Router, body: &str) -> TestResponse {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri("/ingest")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn get(app: Router, uri: &str) -> TestResponse {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub fn two_item_batch() -> String {
    serde_json::json!({
        "items": [
            {"id": "test-1", "name": "Test Item 1", "value": 10.5, "metadata": {"source": "sensor"}},
            {"id": "test-2", "name": "Test Item 2", "value": 20.25}
        ]
    })
    .to_string()
}

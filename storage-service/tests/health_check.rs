mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{test_config, TestApp};
use service_core::observability::init_metrics;
use std::sync::Arc;
use async_trait::async_trait;
use service_core::error::AppError;
use service_core::extract::UploadedFile;
use storage_service::config::StorageBackend;
use storage_service::models::{Message, StoredFile};
use storage_service::services::{MemoryStorage, Storage};
use storage_service::startup::{build_router, AppState};
use tower::util::ServiceExt;

/// Backend whose every call fails, as when MongoDB is down.
struct UnreachableStorage;

fn unreachable() -> AppError {
    AppError::DatabaseError(anyhow::anyhow!("server selection timeout"))
}

#[async_trait]
impl Storage for UnreachableStorage {
    async fn put_file(&self, _file: UploadedFile) -> Result<(), AppError> {
        Err(unreachable())
    }

    async fn list_files(&self) -> Result<Vec<StoredFile>, AppError> {
        Err(unreachable())
    }

    async fn insert_message(&self, _message: &Message) -> Result<(), AppError> {
        Err(unreachable())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Err(unreachable())
    }
}

fn router() -> axum::Router {
    build_router(AppState {
        config: test_config(StorageBackend::Memory),
        storage: Arc::new(MemoryStorage::new()),
    })
}

fn unreachable_router() -> axum::Router {
    build_router(AppState {
        config: test_config(StorageBackend::Mongodb),
        storage: Arc::new(UnreachableStorage),
    })
}

#[tokio::test]
async fn root_returns_running_message() {
    let response = router()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Skyhigh Demo Backend is running");
}

#[tokio::test]
async fn health_check_works() {
    let response = router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "storage-service");
}

#[tokio::test]
async fn readiness_check_works_with_memory_backend() {
    let response = router()
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("/files")
                .header("origin", "http://frontend:8000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn metrics_endpoint_returns_prometheus_format() {
    init_metrics();
    let (app, _storage) = TestApp::spawn().await;

    app.upload("counted.txt", b"abc".to_vec()).await;

    let response = app
        .client
        .get(format!("{}/metrics", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());

    let content_type = response
        .headers()
        .get("content-type")
        .expect("Missing content-type header")
        .to_str()
        .expect("Invalid content-type")
        .to_string();
    assert!(content_type.starts_with("text/plain"));

    let body = response.text().await.expect("Failed to get response body");
    assert!(body.contains("files_uploaded_total"), "Unexpected metrics: {}", body);
}

#[tokio::test]
async fn readiness_fails_when_backend_is_down() {
    let response = unreachable_router()
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn storage_failure_surfaces_as_server_error() {
    let response = unreachable_router()
        .oneshot(Request::builder().uri("/files").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Database error");
}

#[tokio::test]
async fn root_does_not_touch_storage() {
    let response = unreachable_router()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

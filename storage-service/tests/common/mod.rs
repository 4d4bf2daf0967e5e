#![allow(dead_code)]

use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use storage_service::config::{MongoConfig, StorageBackend, StorageConfig, StorageServiceConfig};
use storage_service::services::{MemoryStorage, Storage};
use storage_service::startup::Application;
use uuid::Uuid;

pub const MONGODB_URI: &str = "mongodb://localhost:27017";

pub fn test_config(backend: StorageBackend) -> StorageServiceConfig {
    StorageServiceConfig {
        common: CoreConfig {
            port: 0, // Random port for testing
            ..CoreConfig::default()
        },
        mongodb: MongoConfig {
            uri: MONGODB_URI.to_string(),
            database: format!("storage_test_{}", Uuid::new_v4()),
        },
        storage: StorageConfig {
            backend,
            gridfs_bucket: "fs".to_string(),
            messages_collection: "messages".to_string(),
        },
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawns the service against in-memory storage and hands the store back for inspection.
    pub async fn spawn() -> (Self, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let app = Self::spawn_with_storage(
            test_config(StorageBackend::Memory),
            storage.clone(),
        )
        .await;
        (app, storage)
    }

    pub async fn spawn_with_storage(
        config: StorageServiceConfig,
        storage: Arc<dyn Storage>,
    ) -> Self {
        let app = Application::build_with_storage(config, storage)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client.get(format!("{}/health", address)).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub async fn upload(&self, filename: &str, data: Vec<u8>) -> reqwest::Response {
        let form = reqwest::multipart::Form::new().part(
            "file",
            reqwest::multipart::Part::bytes(data)
                .file_name(filename.to_string())
                .mime_str("text/plain")
                .unwrap(),
        );

        self.client
            .post(format!("{}/upload", self.address))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn list_files(&self) -> serde_json::Value {
        let response = self
            .client
            .get(format!("{}/files", self.address))
            .send()
            .await
            .expect("Failed to execute request");
        assert!(response.status().is_success());
        response.json().await.expect("Failed to parse JSON")
    }

    pub async fn submit_message(&self, message: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/message", self.address))
            .form(&[("message", message)])
            .send()
            .await
            .expect("Failed to execute request")
    }
}

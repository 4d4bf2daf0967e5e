use service_core::observability::{init_metrics, init_tracing};
use storage_service::config::StorageServiceConfig;
use storage_service::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Recorder must exist before the first request is counted
    init_metrics();

    let config = StorageServiceConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        "storage-service",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    );

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start storage-service: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}

use crate::dtos::{RootResponse, UploadResponse};
use crate::models::StoredFile;
use crate::startup::AppState;
use axum::{
    extract::{Multipart, State},
    Json,
};
use metrics::counter;
use service_core::error::AppError;
use service_core::extract::read_file_field;

pub const ROOT_MESSAGE: &str = "Skyhigh Demo Backend is running";

pub async fn read_root() -> Json<RootResponse> {
    Json(RootResponse {
        message: ROOT_MESSAGE.to_string(),
    })
}

pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let file = read_file_field(&mut multipart, "file").await?;
    let filename = file.filename.clone();
    let size = file.size();

    tracing::info!(filename = %filename, size = size, "File upload started");

    state.storage.put_file(file).await?;

    counter!("files_uploaded_total").increment(1);
    counter!("upload_bytes_total").increment(size as u64);

    tracing::info!(filename = %filename, "File upload completed");

    Ok(Json(UploadResponse {
        status: "uploaded".to_string(),
        filename,
    }))
}

pub async fn list_files(State(state): State<AppState>) -> Result<Json<Vec<StoredFile>>, AppError> {
    let files = state.storage.list_files().await?;
    Ok(Json(files))
}

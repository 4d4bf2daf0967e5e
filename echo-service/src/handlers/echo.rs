use crate::dtos::{MessageForm, MessageResponse, RootResponse, UploadResponse};
use axum::{extract::Multipart, Json};
use metrics::counter;
use service_core::error::AppError;
use service_core::extract::{read_file_field, FormFields};

pub const ROOT_MESSAGE: &str = "Welcome to the Skyhigh GitHub Tunnel App!";

pub async fn read_root() -> Json<RootResponse> {
    Json(RootResponse {
        message: ROOT_MESSAGE.to_string(),
    })
}

/// Measures the uploaded file and discards it.
pub async fn upload_file(mut multipart: Multipart) -> Result<Json<UploadResponse>, AppError> {
    let file = read_file_field(&mut multipart, "file").await?;
    let size = file.size();

    counter!("files_uploaded_total").increment(1);
    counter!("upload_bytes_total").increment(size as u64);

    tracing::info!(
        filename = %file.filename,
        content_type = %file.content_type,
        size = size,
        "File received"
    );

    Ok(Json(UploadResponse {
        filename: file.filename,
        size,
    }))
}

pub async fn submit_message(
    FormFields(form): FormFields<MessageForm>,
) -> Json<MessageResponse> {
    counter!("messages_received_total").increment(1);
    tracing::info!(length = form.message.len(), "Message received");

    Json(MessageResponse {
        echo: form.message,
        status: "received".to_string(),
    })
}

use crate::dtos::{MessageForm, MessageResponse};
use crate::models::Message;
use crate::startup::AppState;
use axum::{extract::State, Json};
use metrics::counter;
use service_core::error::AppError;
use service_core::extract::FormFields;

pub async fn submit_message(
    State(state): State<AppState>,
    FormFields(form): FormFields<MessageForm>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = Message::new(form.message);

    state.storage.insert_message(&message).await?;

    counter!("messages_received_total").increment(1);
    tracing::info!(length = message.message.len(), "Message stored");

    Ok(Json(MessageResponse {
        status: "received".to_string(),
        message: message.message,
    }))
}

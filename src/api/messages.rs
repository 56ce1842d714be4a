use axum::{debug_handler, extract::State, http::StatusCode, response::{IntoResponse, Response}};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{db::Database, session::SessionUser, ApiResponse, AppError, AppResult};

use super::{ApiJson, MessagesData};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMessageRequest {
    pub message_id: Uuid,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn get_messages(
    State(db): State<Database>,
    user: SessionUser,
) -> AppResult<Response> {
    let messages = db.list_messages(&user.id).await?;
    if messages.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    Ok(ApiResponse::ok("Messages fetched")
        .with_data(MessagesData { messages })
        .respond(StatusCode::OK))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn delete_message(
    State(db): State<Database>,
    user: SessionUser,
    ApiJson(DeleteMessageRequest { message_id }): ApiJson<DeleteMessageRequest>,
) -> AppResult<Response> {
    if !db.delete_message(&user.id, &message_id.to_string()).await? {
        return Err(AppError::NotFound("Message not found or already deleted".to_owned()));
    }

    Ok(ApiResponse::ok("Message deleted").respond(StatusCode::OK))
}

use axum::{debug_handler, extract::State, http::StatusCode, response::Response};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{db::Database, validation, ApiResponse, AppError, AppResult};

use super::ApiJson;

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub username: String,
    pub content: String,
}

/// Anonymous: no session is consulted.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn send_message(
    State(db): State<Database>,
    ApiJson(SendMessageRequest { username, content }): ApiJson<SendMessageRequest>,
) -> AppResult<Response> {
    validation::message_content(&content).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let Some(recipient) = db.find_verified_user_by_username(&username).await? else {
        return Err(AppError::NotFound("User not found".to_owned()));
    };

    if !recipient.is_accepting_messages {
        return Err(AppError::Forbidden("User is not accepting messages".to_owned()));
    }

    let message = db.insert_message(&recipient.id, &content).await?;
    info!(recipient = %recipient.username, message_id = %message.id, "message delivered");

    Ok(ApiResponse::ok("Message sent successfully").respond(StatusCode::CREATED))
}

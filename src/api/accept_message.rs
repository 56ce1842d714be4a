use axum::{debug_handler, extract::State, http::StatusCode, response::Response};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::info;

use crate::{db::Database, session::SessionUser, ApiResponse, AppError, AppResult};

use super::{AcceptMessagesData, ApiJson};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptMessagesRequest {
    pub accept_messages: bool,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn accept_status(
    State(db): State<Database>,
    user: SessionUser,
) -> AppResult<Response> {
    let Some(found) = db.find_user_by_id(&user.id).await? else {
        return Err(AppError::NotFound("User not found".to_owned()));
    };

    Ok(ApiResponse::ok("Message acceptance status fetched")
        .with_data(AcceptMessagesData { user_accepting_message: found.is_accepting_messages })
        .respond(StatusCode::OK))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn set_accept_status(
    State(db): State<Database>,
    session: Session,
    mut user: SessionUser,
    ApiJson(AcceptMessagesRequest { accept_messages }): ApiJson<AcceptMessagesRequest>,
) -> AppResult<Response> {
    let Some(accepting) = db.set_accepting_messages(&user.id, accept_messages).await? else {
        return Err(AppError::NotFound("User not found".to_owned()));
    };

    user.is_accepting_messages = accepting;
    user.store(&session).await?;
    info!(username = %user.username, accepting, "message acceptance updated");

    Ok(ApiResponse::ok("Message acceptance status updated successfully")
        .with_data(AcceptMessagesData { user_accepting_message: accepting })
        .respond(StatusCode::OK))
}

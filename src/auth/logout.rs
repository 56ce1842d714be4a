use axum::{debug_handler, http::StatusCode, response::Response};
use tower_sessions::Session;

use crate::{ApiResponse, AppResult};

#[debug_handler]
pub(crate) async fn logout(session: Session) -> AppResult<Response> {
    session.flush().await?;
    Ok(ApiResponse::ok("Signed out").respond(StatusCode::OK))
}

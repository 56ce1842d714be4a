use axum::{debug_handler, extract::State, http::StatusCode, response::Response};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::info;

use crate::{api::ApiJson, db::Database, session::SessionUser, ApiResponse, AppError, AppResult};

use super::verify_password;

#[derive(Debug, Serialize, Deserialize)]
pub struct SignInRequest {
    /// Email address or username.
    pub identifier: String,
    pub password: String,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn login(
    State(db): State<Database>,
    session: Session,
    ApiJson(SignInRequest { identifier, password }): ApiJson<SignInRequest>,
) -> AppResult<Response> {
    let Some(user) = db.find_user_by_identifier(identifier.trim()).await? else {
        return Err(AppError::Denied("No user found with this email or username".to_owned()));
    };

    if !user.is_verified {
        return Err(AppError::Denied("Please verify your account before logging in".to_owned()));
    }

    if !verify_password(password, user.password_hash.clone()).await? {
        return Err(AppError::Denied("Incorrect password".to_owned()));
    }

    session.cycle_id().await?;
    let session_user = SessionUser::from(&user);
    session_user.store(&session).await?;

    info!(username = %user.username, "signed in");

    Ok(ApiResponse::ok("Signed in").with_data(session_user).respond(StatusCode::OK))
}

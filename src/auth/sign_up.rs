use axum::{debug_handler, extract::State, http::StatusCode, response::Response};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

use crate::{
    api::ApiJson,
    db::{Database, NewUser},
    validation, ApiResponse, AppError, AppResult, Config,
};

use super::{hash_password, new_verify_code};

#[derive(Debug, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn sign_up(
    State(db): State<Database>,
    State(config): State<Config>,
    ApiJson(request): ApiJson<SignUpRequest>,
) -> AppResult<Response> {
    let input = validation::sign_up(&request.username, &request.email, &request.password)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if db.find_verified_user_by_username(input.username.as_str()).await?.is_some() {
        return Err(AppError::BadRequest("Username is already taken".to_owned()));
    }

    let verify_code = new_verify_code();
    let registration = NewUser {
        username: input.username.into_inner(),
        email: input.email,
        password_hash: hash_password(input.password).await?,
        verify_code: verify_code.clone(),
        verify_code_expiry: OffsetDateTime::now_utc() + config.verify_code_ttl,
    };

    match db.find_user_by_email(&registration.email).await? {
        Some(existing) if existing.is_verified => {
            return Err(AppError::BadRequest("User already exists with this email".to_owned()));
        }
        Some(existing) => {
            db.refresh_registration(&existing.id, registration.clone()).await?;
        }
        None => {
            db.create_user(registration.clone()).await?;
        }
    }

    // no mail transport; the code is delivered through the log
    info!(
        username = %registration.username,
        email = %registration.email,
        %verify_code,
        "verification code issued"
    );

    Ok(ApiResponse::ok("User registered successfully. Please verify your account.")
        .respond(StatusCode::CREATED))
}

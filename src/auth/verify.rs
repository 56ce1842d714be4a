use axum::{debug_handler, extract::State, http::StatusCode, response::Response};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

use crate::{
    api::ApiJson,
    db::{Database, DatabaseError},
    validation, ApiResponse, AppError, AppResult,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub username: String,
    pub code: String,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn verify_code(
    State(db): State<Database>,
    ApiJson(VerifyRequest { username, code }): ApiJson<VerifyRequest>,
) -> AppResult<Response> {
    validation::verify_code(&code).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let Some(user) = db.find_latest_registration(&username).await? else {
        return Err(AppError::NotFound("User not found".to_owned()));
    };

    if user.is_verified {
        // a pending registration for this name was dropped when someone else verified it
        if user.verify_code != code {
            return Err(AppError::BadRequest("Username is already taken".to_owned()));
        }
        return Err(AppError::BadRequest("Account already verified".to_owned()));
    }
    if user.verify_code != code {
        return Err(AppError::BadRequest("Incorrect verification code".to_owned()));
    }
    if user.verify_code_expiry <= OffsetDateTime::now_utc() {
        return Err(AppError::BadRequest(
            "Verification code has expired, please sign up again to get a new code".to_owned(),
        ));
    }

    match db.mark_verified(&user.id).await {
        Err(DatabaseError::UsernameTaken) => {
            return Err(AppError::BadRequest("Username is already taken".to_owned()));
        }
        verified => verified?,
    }
    info!(username = %user.username, "account verified");

    Ok(ApiResponse::ok("Account verified successfully").respond(StatusCode::OK))
}

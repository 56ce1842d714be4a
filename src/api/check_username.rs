use axum::{
    debug_handler,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::Response,
};
use tracing::{debug, error};

use crate::{db::Database, validation::Username, ApiResponse};

/// Never fails: every outcome, storage faults included, is a verdict.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn check_username_unique(
    State(db): State<Database>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    // first `username` wins when the key repeats
    let raw = query.ok().and_then(|Query(pairs)| {
        pairs.into_iter().find(|(key, _)| key == "username").map(|(_, value)| value)
    });

    let username = match Username::from_query(raw.as_deref()) {
        Ok(username) => username,
        Err(e) => {
            debug!(reason = %e, "rejected username");
            return ApiResponse::failure(e.to_string()).respond(StatusCode::BAD_REQUEST);
        }
    };

    match db.find_verified_user_by_username(username.as_str()).await {
        Ok(Some(_)) => {
            ApiResponse::failure("Username already taken").respond(StatusCode::BAD_REQUEST)
        }
        Ok(None) => ApiResponse::ok("Username is unique").respond(StatusCode::OK),
        Err(e) => {
            error!(error = %e, %username, "Error checking username");
            ApiResponse::failure("Error checking username").respond(StatusCode::BAD_REQUEST)
        }
    }
}

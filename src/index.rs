use axum::{debug_handler, response::{Html, IntoResponse, Redirect, Response}};
use tower_sessions::Session;

use crate::{include_res, session::SessionUser, AppResult};

#[debug_handler]
pub async fn index(session: Session) -> AppResult<Response> {
    if SessionUser::load(&session).await?.is_some() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    Ok(Html(include_res!(str, "/pages/index.html")).into_response())
}

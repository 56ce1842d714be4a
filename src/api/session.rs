use axum::{debug_handler, extract::State, http::StatusCode, response::Response};
use tower_sessions::Session;

use crate::{db::Database, session::SessionUser, ApiResponse, AppError, AppResult};

/// Answers from the stored account, not the session copy; a session whose
/// account is gone is ended.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn current_session(
    State(db): State<Database>,
    session: Session,
    user: SessionUser,
) -> AppResult<Response> {
    let Some(found) = db.find_user_by_id(&user.id).await? else {
        session.flush().await?;
        return Err(AppError::Unauthorized);
    };

    let fresh = SessionUser::from(&found);
    if fresh != user {
        fresh.store(&session).await?;
    }

    Ok(ApiResponse::ok("Authenticated").with_data(fresh).respond(StatusCode::OK))
}

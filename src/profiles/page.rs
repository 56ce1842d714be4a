use axum::{debug_handler, extract::{Path, State}, response::{Html, IntoResponse, Response}};

use crate::{db::Database, include_res, res, validation::Username, AppResult};

#[debug_handler(state = crate::AppState)]
pub(crate) async fn profile(
    Path(username): Path<String>,
    State(db): State<Database>,
) -> AppResult<Response> {
    let sorry = res::sorry("profile");

    let Ok(username) = Username::parse(&username) else {
        return sorry;
    };

    let Some(user) = db.find_verified_user_by_username(username.as_str()).await? else {
        return sorry;
    };

    Ok(Html(
        include_res!(str, "/pages/profile.html")
            .replace("{username}", &user.username)
    ).into_response())
}

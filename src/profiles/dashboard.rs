use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Redirect, Response}};
use tower_sessions::Session;

use crate::{db::{Database, Message}, include_res, res, session::SessionUser, AppResult, Config};

#[debug_handler(state = crate::AppState)]
pub(crate) async fn dashboard(
    State(db): State<Database>,
    State(config): State<Config>,
    session: Session,
) -> AppResult<Response> {
    let Some(session_user) = SessionUser::load(&session).await? else {
        return Ok(Redirect::to("/").into_response());
    };

    let Some(user) = db.find_user_by_id(&session_user.id).await? else {
        session.flush().await?;
        return Ok(Redirect::to("/").into_response());
    };

    let messages = db.list_messages(&user.id).await?;
    let message_items = if messages.is_empty() {
        include_res!(str, "/pages/empty.html").to_owned()
    } else {
        messages.iter().map(message_item).collect()
    };

    let profile_url = format!("{}/u/{}", config.public_url, user.username);

    Ok(Html(
        include_res!(str, "/pages/dashboard.html")
            .replace("{profile_url}", &profile_url)
            .replace("{accept_checked}", if user.is_accepting_messages { "checked" } else { "" })
            .replace("{messages}", &message_items)
    ).into_response())
}

fn message_item(message: &Message) -> String {
    include_res!(str, "/pages/message.html")
        .replace("{id}", &message.id)
        .replace("{date}", &res::readable_date(message.created_at))
        .replace("{content}", &res::markdown_to_html(&message.content))
}

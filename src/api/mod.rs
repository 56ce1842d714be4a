mod accept_message;
mod check_username;
mod messages;
mod send_message;
mod session;

use axum::{extract::FromRequest, routing::{get, post}, Router};
use serde::{Deserialize, Serialize};

use crate::{db::Message, AppError, AppState};

pub use accept_message::AcceptMessagesRequest;
pub use messages::DeleteMessageRequest;
pub use send_message::SendMessageRequest;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/check-username-unique", get(check_username::check_username_unique))
        .route(
            "/accept-message",
            get(accept_message::accept_status).post(accept_message::set_accept_status),
        )
        .route("/get-message", get(messages::get_messages))
        .route("/delete-message", post(messages::delete_message))
        .route("/send-message", post(send_message::send_message))
        .route("/session", get(session::current_session))
        .merge(crate::auth::router())
}

/// JSON body whose rejection is reported in the usual envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptMessagesData {
    pub user_accepting_message: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesData {
    pub messages: Vec<Message>,
}

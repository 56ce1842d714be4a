mod dashboard;
mod page;

use axum::{routing::get, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/u/{username}", get(page::profile))
        .route("/dashboard", get(dashboard::dashboard))
}

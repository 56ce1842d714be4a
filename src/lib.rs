pub mod api;
pub mod appresult;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod index;
pub mod profiles;
pub mod res;
pub mod session;
pub mod telemetry;
pub mod validation;

use axum::{extract::FromRef, routing::get, Router};
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};

pub use appresult::{ApiResponse, AppError, AppResult};
pub use config::Config;
use db::Database;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
}

/// The whole service: pages, JSON API and the session layer.
pub fn app(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(state.config.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(state.config.session_ttl));

    Router::new()
        .route("/", get(index::index))
        .merge(profiles::router())
        .nest("/api", api::router())
        .with_state(state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
}

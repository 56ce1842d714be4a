//! Shared setup for the integration tests.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use mysterybox::{
    auth::hash_password,
    db::{Database, NewUser, User},
    AppState, Config,
};
use serde_json::Value;
use time::{Duration, OffsetDateTime};
use tower::ServiceExt;

pub const PASSWORD: &str = "correct horse";

pub async fn test_state() -> AppState {
    AppState {
        db: Database::open_in_memory().await.unwrap(),
        config: Config::default(),
    }
}

pub fn registration(username: &str, email: &str, password_hash: &str) -> NewUser {
    NewUser {
        username: username.to_owned(),
        email: email.to_owned(),
        password_hash: password_hash.to_owned(),
        verify_code: "123456".to_owned(),
        verify_code_expiry: OffsetDateTime::now_utc() + Duration::hours(1),
    }
}

pub async fn unverified_user(db: &Database, username: &str) -> User {
    db.create_user(registration(username, &format!("{username}@example.com"), "unused"))
        .await
        .unwrap()
}

/// A verified user whose password is [`PASSWORD`].
pub async fn verified_user(db: &Database, username: &str) -> User {
    let hash = hash_password(PASSWORD.to_owned()).await.unwrap();
    let user = db
        .create_user(registration(username, &format!("{username}@example.com"), &hash))
        .await
        .unwrap();
    db.mark_verified(&user.id).await.unwrap();
    db.find_user_by_id(&user.id).await.unwrap().unwrap()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
    pub set_cookie: Option<String>,
}

impl TestResponse {
    pub fn message(&self) -> &str {
        self.body
            .as_ref()
            .and_then(|body| body["message"].as_str())
            .unwrap_or_default()
    }

    pub fn success(&self) -> Option<bool> {
        self.body.as_ref().and_then(|body| body["success"].as_bool())
    }
}

/// Send one request through the router. `cookie` is a `name=value` pair.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    json: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = match json {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .map(|value| value.to_str().unwrap().split(';').next().unwrap().to_owned());
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).ok();

    TestResponse { status, body, set_cookie }
}

pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> TestResponse {
    send(app, Method::GET, uri, cookie, None).await
}

pub async fn post(app: &Router, uri: &str, cookie: Option<&str>, json: Value) -> TestResponse {
    send(app, Method::POST, uri, cookie, Some(json)).await
}

/// Signs in and returns the session cookie.
pub async fn sign_in(app: &Router, identifier: &str) -> String {
    let resp = post(
        app,
        "/api/sign-in",
        None,
        serde_json::json!({ "identifier": identifier, "password": PASSWORD }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.message());
    resp.set_cookie.expect("sign-in sets the session cookie")
}

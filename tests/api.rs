mod common;

use axum::http::StatusCode;
use common::{get, post, registration, sign_in, test_state, unverified_user, verified_user};
use mysterybox::db::NewUser;
use serde_json::json;
use time::{Duration, OffsetDateTime};

// === username uniqueness ===

#[tokio::test]
async fn short_username_lists_length_violation() {
    let app = mysterybox::app(test_state().await);

    let resp = get(&app, "/api/check-username-unique?username=ab", None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.success(), Some(false));
    assert_eq!(resp.message(), "Username must be at least 3 characters");
}

#[tokio::test]
async fn missing_username_is_invalid_query() {
    let app = mysterybox::app(test_state().await);

    let resp = get(&app, "/api/check-username-unique", None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.success(), Some(false));
    assert_eq!(resp.message(), "Invalid query parameters");

    let resp = get(&app, "/api/check-username-unique?name=alice", None).await;
    assert_eq!(resp.message(), "Invalid query parameters");
}

#[tokio::test]
async fn every_violated_rule_is_reported() {
    let app = mysterybox::app(test_state().await);

    let uri = "/api/check-username-unique?username=this%20name%20is%20far%20too%20long";
    let resp = get(&app, uri, None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    let message = resp.message();
    assert!(message.contains("Username must be no more than 20 characters"), "{message}");
    assert!(message.contains("Username must not contain special characters"), "{message}");

    let resp = get(&app, "/api/check-username-unique?username=", None).await;
    assert_eq!(
        resp.message(),
        "Username must be at least 3 characters, Username must not contain special characters"
    );
}

#[tokio::test]
async fn verified_username_is_taken() {
    let state = test_state().await;
    verified_user(&state.db, "alice").await;
    let app = mysterybox::app(state);

    let resp = get(&app, "/api/check-username-unique?username=alice", None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.success(), Some(false));
    assert_eq!(resp.message(), "Username already taken");
}

#[tokio::test]
async fn unverified_username_is_still_unique() {
    let state = test_state().await;
    unverified_user(&state.db, "bob").await;
    let app = mysterybox::app(state);

    let resp = get(&app, "/api/check-username-unique?username=bob", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.success(), Some(true));
    assert_eq!(resp.message(), "Username is unique");
}

#[tokio::test]
async fn uniqueness_check_is_idempotent_until_claimed() {
    let state = test_state().await;
    let db = state.db.clone();
    let app = mysterybox::app(state);

    for _ in 0..3 {
        let resp = get(&app, "/api/check-username-unique?username=carol", None).await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.success(), Some(true));
    }

    verified_user(&db, "carol").await;

    let resp = get(&app, "/api/check-username-unique?username=carol", None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.message(), "Username already taken");
}

#[tokio::test]
async fn storage_failure_collapses_to_generic_message() {
    let state = test_state().await;
    state.db.pool().close().await;
    let app = mysterybox::app(state);

    let resp = get(&app, "/api/check-username-unique?username=dave", None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.success(), Some(false));
    assert_eq!(resp.message(), "Error checking username");
}

#[tokio::test]
async fn repeated_username_parameter_uses_first_value() {
    let state = test_state().await;
    let db = state.db.clone();
    let app = mysterybox::app(state);

    let resp = get(&app, "/api/check-username-unique?username=alice&username=bob", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.message(), "Username is unique");

    let resp = get(&app, "/api/check-username-unique?username=ab&username=alice", None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.message(), "Username must be at least 3 characters");

    verified_user(&db, "alice").await;
    let resp = get(&app, "/api/check-username-unique?username=alice&username=bob", None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.message(), "Username already taken");
}

// === account flow ===

#[tokio::test]
async fn sign_up_verify_and_sign_in() {
    let state = test_state().await;
    let db = state.db.clone();
    let app = mysterybox::app(state);

    let resp = post(
        &app,
        "/api/sign-up",
        None,
        json!({ "username": "erin", "email": "erin@example.com", "password": "correct horse" }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.message());

    let resp = post(
        &app,
        "/api/sign-in",
        None,
        json!({ "identifier": "erin", "password": "correct horse" }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.message(), "Please verify your account before logging in");

    let pending = db.find_user_by_email("erin@example.com").await.unwrap().unwrap();
    let wrong = if pending.verify_code == "000000" { "111111" } else { "000000" };
    let resp = post(
        &app,
        "/api/verify-code",
        None,
        json!({ "username": "erin", "code": wrong }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.message(), "Incorrect verification code");

    let resp = post(
        &app,
        "/api/verify-code",
        None,
        json!({ "username": "erin", "code": pending.verify_code }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.message());

    let resp = post(
        &app,
        "/api/verify-code",
        None,
        json!({ "username": "erin", "code": pending.verify_code }),
    )
    .await;
    assert_eq!(resp.message(), "Account already verified");

    let resp = post(
        &app,
        "/api/sign-in",
        None,
        json!({ "identifier": "erin@example.com", "password": "wrong password" }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.message(), "Incorrect password");

    let cookie = sign_in(&app, "erin@example.com").await;
    let resp = get(&app, "/api/session", Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::OK);
    let user = &resp.body.as_ref().unwrap()["data"];
    assert_eq!(user["username"], "erin");
    assert_eq!(user["isVerified"], true);
    assert_eq!(user["isAcceptingMessages"], true);
}

#[tokio::test]
async fn sign_up_rejects_taken_names_and_bad_input() {
    let state = test_state().await;
    verified_user(&state.db, "frank").await;
    let app = mysterybox::app(state);

    let resp = post(
        &app,
        "/api/sign-up",
        None,
        json!({ "username": "frank", "email": "other@example.com", "password": "secret1" }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.message(), "Username is already taken");

    let resp = post(
        &app,
        "/api/sign-up",
        None,
        json!({ "username": "franky", "email": "frank@example.com", "password": "secret1" }),
    )
    .await;
    assert_eq!(resp.message(), "User already exists with this email");

    let resp = post(
        &app,
        "/api/sign-up",
        None,
        json!({ "username": "x", "email": "nope", "password": "1" }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.message().contains("Username must be at least 3 characters"));
    assert!(resp.message().contains("Invalid email address"));
    assert!(resp.message().contains("Password must be at least 6 characters"));
}

#[tokio::test]
async fn sign_out_ends_the_session() {
    let state = test_state().await;
    verified_user(&state.db, "gina").await;
    let app = mysterybox::app(state);

    let cookie = sign_in(&app, "gina").await;
    let resp = post(&app, "/api/sign-out", Some(&cookie), json!({})).await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = get(&app, "/api/session", Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_code_is_rejected() {
    let state = test_state().await;
    state
        .db
        .create_user(NewUser {
            verify_code_expiry: OffsetDateTime::now_utc() - Duration::minutes(1),
            ..registration("lena", "lena@example.com", "unused")
        })
        .await
        .unwrap();
    let app = mysterybox::app(state);

    let resp = post(
        &app,
        "/api/verify-code",
        None,
        json!({ "username": "lena", "code": "123456" }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.message(),
        "Verification code has expired, please sign up again to get a new code"
    );
}

#[tokio::test]
async fn unknown_accounts_are_reported() {
    let app = mysterybox::app(test_state().await);

    let resp = post(
        &app,
        "/api/verify-code",
        None,
        json!({ "username": "ghost", "code": "123456" }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.message(), "User not found");

    let resp = post(
        &app,
        "/api/sign-in",
        None,
        json!({ "identifier": "ghost@example.com", "password": "whatever" }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.message(), "No user found with this email or username");
}

#[tokio::test]
async fn signing_up_again_refreshes_pending_registration() {
    let state = test_state().await;
    let db = state.db.clone();
    let app = mysterybox::app(state);

    let resp = post(
        &app,
        "/api/sign-up",
        None,
        json!({ "username": "mona", "email": "mona@example.com", "password": "first pass" }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.message());
    let first = db.find_user_by_email("mona@example.com").await.unwrap().unwrap();

    let resp = post(
        &app,
        "/api/sign-up",
        None,
        json!({ "username": "mona_l", "email": "mona@example.com", "password": "second pass" }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.message());

    let refreshed = db.find_user_by_email("mona@example.com").await.unwrap().unwrap();
    assert_eq!(refreshed.id, first.id);
    assert_eq!(refreshed.username, "mona_l");
    assert!(!refreshed.is_verified);
    assert!(db.find_latest_registration("mona").await.unwrap().is_none());

    let resp = post(
        &app,
        "/api/verify-code",
        None,
        json!({ "username": "mona_l", "code": refreshed.verify_code }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.message());

    let resp = post(
        &app,
        "/api/sign-in",
        None,
        json!({ "identifier": "mona_l", "password": "second pass" }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.message());
}

#[tokio::test]
async fn verifying_a_name_someone_else_claimed_is_rejected() {
    let state = test_state().await;
    verified_user(&state.db, "nora").await;
    state
        .db
        .create_user(NewUser {
            verify_code: "654321".to_owned(),
            ..registration("nora", "late@example.com", "unused")
        })
        .await
        .unwrap();
    let app = mysterybox::app(state);

    let resp = post(
        &app,
        "/api/verify-code",
        None,
        json!({ "username": "nora", "code": "654321" }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.message(), "Username is already taken");
}

#[tokio::test]
async fn session_ends_when_account_is_gone() {
    let state = test_state().await;
    let db = state.db.clone();
    let otto = verified_user(&db, "otto").await;
    let app = mysterybox::app(state);

    let cookie = sign_in(&app, "otto").await;
    let resp = get(&app, "/api/session", Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::OK);

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(&otto.id)
        .execute(db.pool())
        .await
        .unwrap();

    let resp = get(&app, "/api/session", Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.message(), "Not authenticated");
}

// === messages ===

#[tokio::test]
async fn message_endpoints_require_a_session() {
    let app = mysterybox::app(test_state().await);

    for uri in ["/api/accept-message", "/api/get-message", "/api/session"] {
        let resp = get(&app, uri, None).await;
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(resp.message(), "Not authenticated");
    }

    let resp = post(&app, "/api/accept-message", None, json!({ "acceptMessages": false })).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn anonymous_messages_reach_the_dashboard() {
    let state = test_state().await;
    verified_user(&state.db, "hank").await;
    let app = mysterybox::app(state);
    let cookie = sign_in(&app, "hank").await;

    let resp = get(&app, "/api/get-message", Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);

    let resp = post(
        &app,
        "/api/send-message",
        None,
        json!({ "username": "hank", "content": "you are doing great" }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.message());

    let resp = get(&app, "/api/get-message", Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::OK);
    let messages = resp.body.as_ref().unwrap()["data"]["messages"].as_array().unwrap().clone();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["content"], "you are doing great");
    assert!(messages[0]["_id"].is_string());
    assert!(messages[0]["createdAt"].is_string());
    assert!(messages[0].get("userId").is_none());
}

#[tokio::test]
async fn send_message_checks_content_and_recipient() {
    let state = test_state().await;
    verified_user(&state.db, "ivan").await;
    unverified_user(&state.db, "judy").await;
    let app = mysterybox::app(state);

    let resp = post(
        &app,
        "/api/send-message",
        None,
        json!({ "username": "ivan", "content": "hi" }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.message(), "Content must be at least 10 characters");

    let resp = post(
        &app,
        "/api/send-message",
        None,
        json!({ "username": "judy", "content": "hello there judy" }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.message(), "User not found");

    let resp = post(&app, "/api/send-message", None, json!({ "username": "ivan" })).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.success(), Some(false));
}

#[tokio::test]
async fn toggling_acceptance_blocks_new_messages() {
    let state = test_state().await;
    verified_user(&state.db, "kim").await;
    let app = mysterybox::app(state);
    let cookie = sign_in(&app, "kim").await;

    let resp = post(
        &app,
        "/api/accept-message",
        Some(&cookie),
        json!({ "acceptMessages": false }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body.as_ref().unwrap()["data"]["userAcceptingMessage"], false);

    let resp = get(&app, "/api/accept-message", Some(&cookie)).await;
    assert_eq!(resp.body.as_ref().unwrap()["data"]["userAcceptingMessage"], false);

    let resp = get(&app, "/api/session", Some(&cookie)).await;
    assert_eq!(resp.body.as_ref().unwrap()["data"]["isAcceptingMessages"], false);

    let resp = post(
        &app,
        "/api/send-message",
        None,
        json!({ "username": "kim", "content": "are you there kim?" }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    assert_eq!(resp.message(), "User is not accepting messages");
}

#[tokio::test]
async fn delete_is_keyed_by_id_and_owner() {
    let state = test_state().await;
    let owner = verified_user(&state.db, "leo").await;
    verified_user(&state.db, "mia").await;
    let kept = state.db.insert_message(&owner.id, "same words, same time").await.unwrap();
    let doomed = state.db.insert_message(&owner.id, "same words, same time").await.unwrap();
    let db = state.db.clone();
    let app = mysterybox::app(state);

    let intruder = sign_in(&app, "mia").await;
    let resp = post(
        &app,
        "/api/delete-message",
        Some(&intruder),
        json!({ "messageId": doomed.id }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.message(), "Message not found or already deleted");

    let cookie = sign_in(&app, "leo").await;
    let resp = post(
        &app,
        "/api/delete-message",
        Some(&cookie),
        json!({ "messageId": doomed.id }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);

    let remaining = db.list_messages(&owner.id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, kept.id);

    let resp = post(
        &app,
        "/api/delete-message",
        Some(&cookie),
        json!({ "messageId": "not-a-uuid" }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

// === pages ===

#[tokio::test]
async fn profile_page_only_for_verified_users() {
    let state = test_state().await;
    verified_user(&state.db, "nina").await;
    unverified_user(&state.db, "omar").await;
    let app = mysterybox::app(state);

    assert_eq!(get(&app, "/u/nina", None).await.status, StatusCode::OK);
    assert_eq!(get(&app, "/u/omar", None).await.status, StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/u/no%20such", None).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_page_redirects_without_session() {
    let app = mysterybox::app(test_state().await);

    let resp = get(&app, "/dashboard", None).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
}

//! Integration tests for the auth flow: verification codes through the
//! HTTP surface, registration, login, refresh, and password reset.
//!
//! Tests seed the in-memory verification stores directly (SMTP is never
//! configured here) and drive everything else through the real router.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, register_user};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn send_code_then_too_many_requests(pool: PgPool) {
    let (app, _state) = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/auth/send-verification-code",
        serde_json::json!({ "email": "new@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["expires_in"], 300);

    // A second request while the code is live is rate-limited.
    let response = post_json(
        app,
        "/api/v1/auth/send-verification-code",
        serde_json::json!({ "email": "new@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn send_code_rejects_registered_email(pool: PgPool) {
    let (app, state) = common::build_test_app(pool);
    register_user(&app, &state, "taken", "taken@example.com", "password1").await;

    let response = post_json(
        app,
        "/api/v1/auth/send-verification-code",
        serde_json::json!({ "email": "taken@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_wrong_then_accepts_right_code(pool: PgPool) {
    let (app, state) = common::build_test_app(pool);
    state.verification_codes.store("alice@example.com", "123456");

    let request = |code: &str| {
        serde_json::json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "password1",
            "verification_code": code,
        })
    };

    let response = post_json(app.clone(), "/api/v1/auth/register", request("000000")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CODE_MISMATCH");

    let response = post_json(app.clone(), "/api/v1/auth/register", request("123456")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["username"], "alice");
    assert!(json["data"]["access_token"].is_string());
    assert!(json["data"]["refresh_token"].is_string());

    // The code was consumed by the successful registration.
    let response = post_json(
        app,
        "/api/v1/auth/verify-code",
        serde_json::json!({ "email": "alice@example.com", "code": "123456" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CODE_NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn three_wrong_codes_exhaust_the_entry(pool: PgPool) {
    let (app, state) = common::build_test_app(pool);
    state.verification_codes.store("bob@example.com", "123456");

    let wrong = serde_json::json!({ "email": "bob@example.com", "code": "000000" });

    for expected in ["CODE_MISMATCH", "CODE_MISMATCH", "TOO_MANY_ATTEMPTS"] {
        let response = post_json(app.clone(), "/api/v1/auth/verify-code", wrong.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], expected);
    }

    // Exhaustion destroyed the entry; even the right code is gone.
    let response = post_json(
        app,
        "/api/v1/auth/verify-code",
        serde_json::json!({ "email": "bob@example.com", "code": "123456" }),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["code"], "CODE_NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_refresh_and_me(pool: PgPool) {
    let (app, state) = common::build_test_app(pool);
    register_user(&app, &state, "carol", "carol@example.com", "password1").await;

    // Wrong password is rejected.
    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "carol@example.com", "password": "wrong" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Correct password returns a token pair.
    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "carol@example.com", "password": "password1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let access = json["data"]["access_token"].as_str().unwrap().to_string();
    let refresh = json["data"]["refresh_token"].as_str().unwrap().to_string();

    // The access token authenticates /auth/me.
    let response = get_auth(app.clone(), "/api/v1/auth/me", &access).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "carol@example.com");

    // Refresh rotates the token: the new pair works, the old refresh
    // token does not.
    let response = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn password_reset_flow(pool: PgPool) {
    let (app, state) = common::build_test_app(pool);
    register_user(&app, &state, "dave", "dave@example.com", "password1").await;

    // Forgot-password answers 200 even for unknown emails, but only
    // stores a code for real accounts.
    let response = post_json(
        app.clone(),
        "/api/v1/auth/forgot-password",
        serde_json::json!({ "email": "ghost@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!state.reset_codes.has_live_entry("ghost@example.com"));

    let response = post_json(
        app.clone(),
        "/api/v1/auth/forgot-password",
        serde_json::json!({ "email": "dave@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(state.reset_codes.has_live_entry("dave@example.com"));

    // Reset with a seeded known code.
    state.reset_codes.store("dave@example.com", "654321");
    let response = post_json(
        app.clone(),
        "/api/v1/auth/reset-password",
        serde_json::json!({
            "email": "dave@example.com",
            "code": "654321",
            "new_password": "password2",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Old password is dead, new one logs in.
    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "dave@example.com", "password": "password1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": "dave@example.com", "password": "password2" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // A registration code for the same address would not have been
    // usable as a reset code: the stores are separate.
    assert!(!state.verification_codes.has_live_entry("dave@example.com"));
}

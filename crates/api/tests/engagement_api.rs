//! Integration tests for the engagement flow over HTTP: submit a tool,
//! approve it, rate and favorite it, and watch the derived counters on
//! the tool row move.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json_auth, register_user};
use sqlx::PgPool;
use toolhub_core::types::DbId;

async fn promote_to_admin(pool: &PgPool, email: &str) {
    sqlx::query("UPDATE users SET is_admin = true WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submit_approve_rate_favorite(pool: PgPool) {
    let (app, state) = common::build_test_app(pool.clone());

    let admin_token = register_user(&app, &state, "admin", "admin@example.com", "password1").await;
    promote_to_admin(&pool, "admin@example.com").await;
    // Token was minted before the promotion; mint a fresh one.
    let response = post_json_auth(
        app.clone(),
        "/api/v1/auth/logout",
        serde_json::json!({}),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = common::post_json(
        app.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "admin@example.com", "password": "password1" }),
    )
    .await;
    let admin_token = body_json(response).await["data"]["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let alice_token = register_user(&app, &state, "alice", "alice@example.com", "password1").await;
    let bob_token = register_user(&app, &state, "bob", "bob@example.com", "password1").await;

    // Alice submits a tool; it enters the moderation queue.
    let response = post_json_auth(
        app.clone(),
        "/api/v1/tools/submit",
        serde_json::json!({
            "name": "Prompt Sharpener",
            "description": "Tightens up sloppy prompts.",
            "category": "writing",
            "tags": ["prompts"],
        }),
        &alice_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let tool_id = body_json(response).await["data"]["id"].as_i64().unwrap() as DbId;

    // Rating an unapproved tool is refused.
    let response = post_json_auth(
        app.clone(),
        "/api/v1/ratings",
        serde_json::json!({ "tool_id": tool_id, "rating": 5 }),
        &bob_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Admin approves; the submitter gets a notification.
    let response = app_put_review(&app, tool_id, &admin_token).await;
    assert_eq!(response, StatusCode::OK);

    // Bob rates 5, Alice rates 4.
    for (token, stars) in [(&bob_token, 5), (&alice_token, 4)] {
        let response = post_json_auth(
            app.clone(),
            "/api/v1/ratings",
            serde_json::json!({ "tool_id": tool_id, "rating": stars }),
            token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // A second rating from the same user conflicts.
    let response = post_json_auth(
        app.clone(),
        "/api/v1/ratings",
        serde_json::json!({ "tool_id": tool_id, "rating": 1 }),
        &bob_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Bob favorites the tool.
    let response = post_json_auth(
        app.clone(),
        "/api/v1/favorites",
        serde_json::json!({ "tool_id": tool_id }),
        &bob_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // The derived counters are visible on the public tool row.
    let response = get(app.clone(), &format!("/api/v1/tools/{tool_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let tool = body_json(response).await;
    assert_eq!(tool["data"]["rating_count"], 2);
    assert_eq!(tool["data"]["average_rating"], 4.5);
    assert_eq!(tool["data"]["favorite_count"], 1);

    // Alice received the approval notification.
    let response = common::get_auth(app, "/api/v1/notifications/unread-count", &alice_token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["unread"], 1);
}

async fn app_put_review(
    app: &axum::Router,
    tool_id: DbId,
    token: &str,
) -> StatusCode {
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/v1/tools/{tool_id}/review"))
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from(
                    serde_json::json!({ "action": "approve" }).to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("response");
    response.status()
}

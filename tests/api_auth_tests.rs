// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API authentication and CORS tests.
//!
//! These tests verify that:
//! 1. Protected routes reject requests without valid tokens
//! 2. Protected routes accept requests with valid tokens
//! 3. Public routes stay public
//! 4. CORS preflight requests return correct headers

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use haunted_fortune::db::Storage;
use haunted_fortune::middleware::auth::create_session_token;
use haunted_fortune::models::UpsertUser;
use tower::ServiceExt;

mod common;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn me_request() -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri("/api/auth/user")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let (app, _store, _key) = common::create_test_app(None);

    let response = app.oneshot(me_request()).await.unwrap();

    // Should return 401 Unauthorized without token
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_invalid_token() {
    let (app, _store, _key) = common::create_test_app(None);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/auth/user")
                .header(header::AUTHORIZATION, "Bearer invalid.token.here")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_valid_token() {
    let (app, store, signing_key) = common::create_test_app(None);

    store
        .upsert_user(UpsertUser {
            id: "user-7".to_string(),
            email: Some("seer@example.com".to_string()),
            first_name: Some("Cassandra".to_string()),
            last_name: Some("Vane".to_string()),
            profile_image_url: None,
        })
        .await
        .unwrap();

    let token = create_session_token("user-7", &signing_key).unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/auth/user")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let user = body_json(response).await;
    assert_eq!(user["id"], "user-7");
    assert_eq!(user["email"], "seer@example.com");
    assert_eq!(user["firstName"], "Cassandra");
    assert_eq!(user["curseLevel"], 0);
    assert_eq!(user["fortuneStreak"], 0);
}

#[tokio::test]
async fn test_session_cookie_is_accepted() {
    let (app, store, signing_key) = common::create_test_app(None);

    store
        .upsert_user(UpsertUser {
            id: "user-8".to_string(),
            email: None,
            first_name: None,
            last_name: None,
            profile_image_url: None,
        })
        .await
        .unwrap();

    let token = create_session_token("user-8", &signing_key).unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/auth/user")
                .header(header::COOKIE, format!("fortune_session={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_valid_token_for_unknown_user_is_404() {
    let (app, _store, signing_key) = common::create_test_app(None);

    let token = create_session_token("ghost", &signing_key).unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/auth/user")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_history_is_public() {
    let (app, _store, _key) = common::create_test_app(None);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/fortunes")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let history = body_json(response).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _store, _key) = common::create_test_app(None);

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/fortune")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // OPTIONS should return 200 (CORS preflight success)
    assert_eq!(response.status(), StatusCode::OK);

    // Should have CORS headers
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn test_public_route_no_auth_required() {
    let (app, _store, _key) = common::create_test_app(None);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Health should be accessible without auth
    assert_eq!(response.status(), StatusCode::OK);
}

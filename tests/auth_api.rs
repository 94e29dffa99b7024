mod common;

use axum::body::Body;
use axum::http::{ header::AUTHORIZATION, Request, StatusCode };
use axum::routing::{ get, post };
use axum::{ Json, Router };
use common::{ build_app_with_auth, request_json, send, serve_locally };
use sea_orm::{ DatabaseBackend, MockDatabase };
use serde_json::json;

/// Stand-in for the hosted auth provider.
fn fake_provider() -> Router {
    Router::new()
        .route(
            "/auth/v1/user",
            get(|| async {
                (StatusCode::UNAUTHORIZED, Json(json!({ "msg": "invalid JWT" })))
            })
        )
        .route(
            "/auth/v1/signup",
            post(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "code": 422, "msg": "User already registered" })),
                )
            })
        )
        .route(
            "/auth/v1/token",
            post(|| async {
                Json(json!({ "access_token": "jwt-123", "token_type": "bearer" }))
            })
        )
}

async fn app() -> Router {
    let provider_url = serve_locally(fake_provider()).await;
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    build_app_with_auth(db, &provider_url)
}

#[tokio::test]
async fn provider_401_is_relayed_as_401() {
    let app = app().await;

    let req = Request::builder()
        .method("GET")
        .uri("/api/auth/user")
        .header(AUTHORIZATION, "Bearer expired-token")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn provider_failure_message_is_passed_through() {
    let app = app().await;

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/auth/sign-up",
        Some(json!({ "email": "test@example.com", "password": "password123", "name": "John" }))
    ).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "AUTH_ERROR");
    assert_eq!(body["error"]["message"], "User already registered");
}

#[tokio::test]
async fn login_returns_the_provider_session() {
    let app = app().await;

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/auth/login",
        Some(json!({ "email": "test@example.com", "password": "password123" }))
    ).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["access_token"], "jwt-123");
}

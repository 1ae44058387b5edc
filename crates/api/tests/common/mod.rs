#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use messagely_core::policy::ListingPolicy;
use messagely_db::store::MemoryStore;
use tower::ServiceExt;

use messagely_api::auth::jwt::JwtConfig;
use messagely_api::config::{AuthConfig, ServerConfig, DEFAULT_AUTH_HEADER};
use messagely_api::router::build_app_router;
use messagely_api::state::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses the lowest Argon2 work factor so hashing stays fast.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        auth: AuthConfig {
            jwt: JwtConfig {
                secret: TEST_SECRET.to_string(),
                token_expiry_secs: Some(3600),
            },
            hash_work_factor: 1,
            auth_header: DEFAULT_AUTH_HEADER.parse().unwrap(),
            listing_policy: ListingPolicy::OwnerOnly,
        },
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// The router is cheap to clone; clones share the same store.
pub fn build_test_app() -> Router {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> Router {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(config, store.clone(), store).expect("test work factor is valid");
    build_app_router(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Register a user through the API and return the issued token.
pub async fn register(app: &Router, username: &str, password: &str) -> String {
    let body = serde_json::json!({
        "username": username,
        "password": password,
        "first_name": format!("{username}-first"),
        "last_name": format!("{username}-last"),
        "phone": "555-0100",
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Send a message through the API and return its id.
pub async fn send_message(app: &Router, token: &str, to: &str, body: &str) -> i64 {
    let payload = serde_json::json!({ "to_username": to, "body": body });
    let response = post_json_auth(app, "/api/v1/messages", payload, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

//! HTTP-level integration tests for login and registration.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, register};
use messagely_api::auth::jwt::{JwtConfig, TokenIssuer};

async fn login(app: &axum::Router, username: &str, password: &str) -> axum::response::Response {
    let body = serde_json::json!({ "username": username, "password": password });
    post_json(app, "/api/v1/auth/login", body).await
}

/// Registration returns 201 with a token whose subject is the new user.
#[tokio::test]
async fn register_returns_token_for_new_user() {
    let app = common::build_test_app();
    let token = register(&app, "alice", "secret").await;

    let issuer = TokenIssuer::new(&common::test_config().auth.jwt);
    let claims = issuer.verify(&token).expect("issued token must verify");
    assert_eq!(claims.sub, "alice");
}

/// Registration logs the user in, so `last_login_at` is already set.
#[tokio::test]
async fn register_records_login() {
    let app = common::build_test_app();
    let token = register(&app, "alice", "secret").await;

    let response = get_auth(&app, "/api/v1/users/alice", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["last_login_at"].is_string());
    assert!(json["data"].get("password_hash").is_none());
    assert!(json["data"].get("password").is_none());
}

#[tokio::test]
async fn duplicate_registration_returns_409() {
    let app = common::build_test_app();
    register(&app, "alice", "secret").await;

    let body = serde_json::json!({
        "username": "alice",
        "password": "another",
        "first_name": "A",
        "last_name": "B",
        "phone": "1",
    });
    let response = post_json(&app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "DUPLICATE_IDENTITY");
}

#[tokio::test]
async fn invalid_registration_returns_400() {
    let app = common::build_test_app();
    let body = serde_json::json!({
        "username": "has space",
        "password": "secret",
        "first_name": "A",
        "last_name": "B",
        "phone": "1",
    });
    let response = post_json(&app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

/// Successful login returns 200 with a token for the user.
#[tokio::test]
async fn login_success() {
    let app = common::build_test_app();
    register(&app, "alice", "secret").await;

    let response = login(&app, "alice", "secret").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let token = json["data"]["token"].as_str().unwrap();
    assert_eq!(json["data"]["expires_in"], 3600);

    let issuer = TokenIssuer::new(&common::test_config().auth.jwt);
    assert_eq!(issuer.verify(token).unwrap().sub, "alice");
}

/// A wrong password and an unknown user produce identical responses.
#[tokio::test]
async fn wrong_password_and_unknown_user_are_indistinguishable() {
    let app = common::build_test_app();
    register(&app, "alice", "secret").await;

    let wrong = login(&app, "alice", "not-the-password").await;
    let unknown = login(&app, "ghost", "secret").await;

    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(wrong).await, body_json(unknown).await);
}

/// Usernames are case-sensitive.
#[tokio::test]
async fn login_username_is_case_sensitive() {
    let app = common::build_test_app();
    register(&app, "alice", "secret").await;

    let response = login(&app, "Alice", "secret").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Tokens signed with another secret are rejected with 401.
#[tokio::test]
async fn foreign_token_is_unauthenticated() {
    let app = common::build_test_app();
    register(&app, "alice", "secret").await;

    let foreign = TokenIssuer::new(&JwtConfig {
        secret: "not-the-server-secret".to_string(),
        token_expiry_secs: None,
    })
    .issue("alice")
    .unwrap();

    let response = get_auth(&app, "/api/v1/users/alice", &foreign).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHENTICATED");
}

/// A token with a one-second lifetime is rejected two seconds later.
#[tokio::test]
async fn expired_token_is_unauthenticated() {
    let mut config = common::test_config();
    config.auth.jwt.token_expiry_secs = Some(1);
    let app = common::build_test_app_with(config);

    let token = register(&app, "alice", "secret").await;
    assert_eq!(
        get_auth(&app, "/api/v1/users/alice", &token).await.status(),
        StatusCode::OK
    );

    tokio::time::sleep(std::time::Duration::from_secs(2)).await;

    let response = get_auth(&app, "/api/v1/users/alice", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHENTICATED");
}

/// With a custom header configured, the token must arrive in that header.
#[tokio::test]
async fn custom_auth_header_is_used() {
    let mut config = common::test_config();
    config.auth.auth_header = "x-messagely-auth".parse().unwrap();
    let app = common::build_test_app_with(config);
    let token = register(&app, "alice", "secret").await;

    let response = get_auth(&app, "/api/v1/users/alice", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = axum::http::Request::builder()
        .uri("/api/v1/users/alice")
        .header("x-messagely-auth", format!("Bearer {token}"))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unparseable_login_body_uses_error_envelope() {
    let app = common::build_test_app();
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/v1/auth/login")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].is_string());
}

//! End-to-end scenario driven directly through the auth components and the
//! authorization policy, without the HTTP layer.

use std::sync::Arc;

use assert_matches::assert_matches;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue};
use messagely_api::auth::credentials::CredentialStore;
use messagely_api::auth::jwt::{JwtConfig, TokenIssuer};
use messagely_api::middleware::auth::authenticate;
use messagely_core::error::CoreError;
use messagely_core::identity::VerifiedIdentity;
use messagely_core::policy::{ensure_participant, ensure_recipient, ensure_self};
use messagely_core::validation::NewIdentity;
use messagely_db::models::message::CreateMessage;
use messagely_db::store::{MemoryStore, MessageStore};

fn identity(username: &str) -> NewIdentity {
    NewIdentity {
        username: username.to_string(),
        password: format!("{username}-password"),
        first_name: "First".to_string(),
        last_name: "Last".to_string(),
        phone: "555-0100".to_string(),
    }
}

fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );
    headers
}

async fn login_as(creds: &CredentialStore, tokens: &TokenIssuer, username: &str) -> VerifiedIdentity {
    let token = creds
        .login(username, &format!("{username}-password"), tokens)
        .await
        .unwrap();
    authenticate(&bearer(&token), &AUTHORIZATION, tokens).unwrap()
}

#[tokio::test]
async fn alice_bob_carol_scenario() {
    let store = Arc::new(MemoryStore::new());
    let creds = CredentialStore::new(store.clone(), 1).unwrap();
    let tokens = TokenIssuer::new(&JwtConfig {
        secret: "scenario-secret".to_string(),
        token_expiry_secs: Some(3600),
    });

    for name in ["alice", "bob", "carol"] {
        creds.register(identity(name)).await.unwrap();
    }

    let alice = login_as(&creds, &tokens, "alice").await;
    let bob = login_as(&creds, &tokens, "bob").await;
    let carol = login_as(&creds, &tokens, "carol").await;

    let sent = store
        .insert_message(&CreateMessage {
            from_username: alice.username().to_string(),
            to_username: "bob".to_string(),
            body: "hello bob".to_string(),
        })
        .await
        .unwrap();
    let message = store.find_message_by_id(sent.id).await.unwrap().unwrap();

    // Reading: both parties allowed, a third party denied.
    assert!(ensure_participant(&message, &alice).is_ok());
    assert!(ensure_participant(&message, &bob).is_ok());
    assert_matches!(
        ensure_participant(&message, &carol),
        Err(CoreError::Forbidden(_))
    );

    // Marking read: recipient only.
    assert_matches!(ensure_recipient(&message, &alice), Err(CoreError::Forbidden(_)));
    assert!(ensure_recipient(&message, &bob).is_ok());

    let first = store.update_message_read_at(sent.id).await.unwrap().unwrap();
    let second = store.update_message_read_at(sent.id).await.unwrap().unwrap();
    assert_eq!(first.read_at, second.read_at);

    // Profiles: self only.
    assert!(ensure_self("alice", &alice).is_ok());
    assert_matches!(ensure_self("alice", &bob), Err(CoreError::Forbidden(_)));
}

#[tokio::test]
async fn token_with_one_second_expiry_stops_authenticating() {
    let store = Arc::new(MemoryStore::new());
    let creds = CredentialStore::new(store, 1).unwrap();
    let tokens = TokenIssuer::new(&JwtConfig {
        secret: "scenario-secret".to_string(),
        token_expiry_secs: Some(1),
    });
    creds.register(identity("alice")).await.unwrap();

    let token = creds
        .login("alice", "alice-password", &tokens)
        .await
        .unwrap();
    assert!(authenticate(&bearer(&token), &AUTHORIZATION, &tokens).is_ok());

    tokio::time::sleep(std::time::Duration::from_secs(2)).await;

    assert_matches!(
        authenticate(&bearer(&token), &AUTHORIZATION, &tokens),
        Err(CoreError::Unauthenticated)
    );
}

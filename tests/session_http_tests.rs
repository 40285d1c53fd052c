// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end session tests: the HTTP identity client against a real
//! server on a loopback port.

use gym_tracker::session::{
    CredentialStore, HttpIdentityApi, IdentityApi, MemoryCredentialStore, SessionBootstrap,
    SessionClientConfig, SessionState, TracingNotifier, TOKEN_KEY, USER_ID_KEY,
};
use std::sync::Arc;
use tokio::net::TcpListener;

mod common;

/// Serve a fresh test app and return its base URL.
async fn spawn_server() -> (String, Arc<gym_tracker::AppState>) {
    let (app, state) = common::create_test_app();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

fn client(base_url: &str) -> (HttpIdentityApi, Arc<MemoryCredentialStore>) {
    let credentials = Arc::new(MemoryCredentialStore::new());
    let api = HttpIdentityApi::new(SessionClientConfig::new(base_url), credentials.clone())
        .expect("HTTP client");
    (api, credentials)
}

#[tokio::test]
async fn test_sign_in_check_and_logout() {
    let (base_url, state) = spawn_server().await;
    let user = common::seed_user(&state, "ada@example.com");
    let (api, credentials) = client(&base_url);

    let profile = api
        .sign_in("ada@example.com", common::TEST_PASSWORD)
        .await
        .unwrap();
    assert_eq!(profile.id, user.id);
    assert_eq!(credentials.get(USER_ID_KEY), Some(user.id.clone()));
    let token = credentials.get(TOKEN_KEY).expect("session token stored");

    let bootstrap =
        SessionBootstrap::new(api, credentials.clone(), Arc::new(TracingNotifier));
    let session = bootstrap.check().await;
    assert!(session.is_authenticated);
    assert_eq!(session.user.map(|u| u.email), Some("ada@example.com".to_string()));

    let session = bootstrap.logout().await;
    assert!(!session.is_authenticated);
    assert_eq!(credentials.get(TOKEN_KEY), None);

    // The old token no longer works on the server either.
    let (stale, stale_credentials) = client(&base_url);
    stale_credentials.set(TOKEN_KEY, &token);
    let err = stale.who_am_i().await.unwrap_err();
    assert_eq!(err.kind(), "unauthenticated");
}

#[tokio::test]
async fn test_check_without_session_is_unauthenticated() {
    let (base_url, _) = spawn_server().await;
    let (api, credentials) = client(&base_url);
    credentials.set(USER_ID_KEY, "65f0c0ffee0000000000abcd");

    let bootstrap = SessionBootstrap::new(api, credentials.clone(), Arc::new(TracingNotifier));
    bootstrap.mount();
    let session = bootstrap.settled().await;

    assert!(!session.is_authenticated);
    assert_eq!(bootstrap.state(), SessionState::Unauthenticated);
    assert_eq!(credentials.get(USER_ID_KEY), None);
}

#[tokio::test]
async fn test_sign_in_with_wrong_password() {
    let (base_url, state) = spawn_server().await;
    common::seed_user(&state, "ada@example.com");
    let (api, credentials) = client(&base_url);

    let err = api
        .sign_in("ada@example.com", "not-the-password")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "unauthenticated");
    assert_eq!(credentials.get(TOKEN_KEY), None);
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let (api, _) = client(&format!("http://{addr}"));

    let err = api.who_am_i().await.unwrap_err();

    assert_eq!(err.kind(), "transport");
}

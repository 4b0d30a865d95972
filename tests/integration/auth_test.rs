//! Handshake credential checks and role-guarded routes.

use http::StatusCode;
use tokio_tungstenite::tungstenite;

use trafficwatch_entity::user::UserRole;

use crate::helpers::{TestApp, connect};

#[tokio::test]
async fn test_ws_upgrade_without_token() {
    let app = TestApp::new();

    let response = app.request("GET", "/ws", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["errorCode"], "TOKEN_REQUIRED");
    assert!(app.engine.registry.is_empty());
}

#[tokio::test]
async fn test_ws_upgrade_with_invalid_token() {
    let app = TestApp::new();

    let response = app.request("GET", "/ws?token=not.a.jwt", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["errorCode"], "INVALID_TOKEN");
    assert_eq!(app.engine.metrics.snapshot().connections_rejected, 1);
}

#[tokio::test]
async fn test_ws_upgrade_with_expired_token() {
    let app = TestApp::new();
    let expired = app
        .encoder
        .issue_with_ttl("9", "old@comune.tn.it", None, -3600)
        .unwrap();

    let response = app
        .request("GET", "/ws", Some(&expired))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["errorCode"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_valid_token_without_upgrade_is_not_admitted() {
    let app = TestApp::new();
    let token = app.token("1", Some(UserRole::Sorvegliante));

    let response = app.request("GET", "/ws", Some(&token)).await;

    assert_ne!(response.status, StatusCode::UNAUTHORIZED);
    assert!(app.engine.registry.is_empty());
}

#[tokio::test]
async fn test_rejected_socket_never_registers() {
    let app = TestApp::new();
    let addr = app.serve().await;

    let err = tokio_tungstenite::connect_async(format!("ws://{addr}/ws?token=forged"))
        .await
        .unwrap_err();
    match err {
        tungstenite::Error::Http(response) => {
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED)
        }
        other => panic!("expected HTTP rejection, got {other:?}"),
    }

    assert!(app.engine.registry.is_empty());

    let token = app.token("1", None);
    let _client = connect(addr, &token).await;
    app.wait_for_connections(1).await;
}

#[tokio::test]
async fn test_detection_requires_token() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/v1/detection", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["errorCode"], "TOKEN_REQUIRED");
}

#[tokio::test]
async fn test_detection_requires_admin_role() {
    let app = TestApp::new();

    for role in [
        Some(UserRole::Sorvegliante),
        Some(UserRole::DipendenteComunale),
        None,
    ] {
        let token = app.token("2", role);
        let response = app.request("POST", "/api/v1/detection/start", Some(&token)).await;

        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(response.body["errorCode"], "UNAUTHORIZED_ROLE");
    }

    assert!(!app.engine.emitter.is_running().await);
}

#[tokio::test]
async fn test_percent_encoded_query_token_is_decoded() {
    let app = TestApp::new();
    let admin = app.token("1", Some(UserRole::Amministratore));
    let encoded = admin.replace('.', "%2E");

    let plain = app
        .request("GET", &format!("/api/v1/detection?token={admin}"), None)
        .await;
    assert_eq!(plain.status, StatusCode::OK);

    let response = app
        .request(
            "GET",
            &format!("/api/v1/detection?transport=websocket&token={encoded}"),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_percent_encoded_socket_token_is_admitted() {
    let app = TestApp::new();
    let addr = app.serve().await;
    let encoded = app.token("1", Some(UserRole::Sorvegliante)).replace('.', "%2E");

    let _client = connect(addr, &encoded).await;
    app.wait_for_connections(1).await;
}

#[tokio::test]
async fn test_blank_authorization_falls_back_to_query_token() {
    let app = TestApp::new();
    let admin = app.token("1", Some(UserRole::Amministratore));

    let response = app
        .request("GET", &format!("/api/v1/detection?token={admin}"), Some(""))
        .await;

    assert_eq!(response.status, StatusCode::OK);
}

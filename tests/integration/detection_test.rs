//! Admin detection control and health reporting.

use std::time::Duration;

use http::StatusCode;

use trafficwatch_entity::user::UserRole;

use crate::helpers::{TestApp, connect, next_json};

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["connections"], 0);
    assert_eq!(response.body["detection"]["running"], false);
    assert!(response.body["metrics"]["ticks"].is_u64());
}

#[tokio::test]
async fn test_admin_start_stop() {
    let app = TestApp::new();
    let admin = app.token("1", Some(UserRole::Amministratore));

    let response = app.request("POST", "/api/v1/detection/start", Some(&admin)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["changed"], true);
    assert_eq!(response.body["data"]["status"]["running"], true);

    let response = app.request("POST", "/api/v1/detection/start", Some(&admin)).await;
    assert_eq!(response.body["data"]["changed"], false);

    let response = app.request("POST", "/api/v1/detection/stop", Some(&admin)).await;
    assert_eq!(response.body["data"]["changed"], true);
    assert_eq!(response.body["data"]["status"]["running"], false);

    let response = app.request("GET", "/api/v1/detection", Some(&admin)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["state"], "stopped");
    assert_eq!(response.body["data"]["intervalSeconds"], 7);
}

#[tokio::test]
async fn test_admin_trigger_broadcasts() {
    let app = TestApp::new();
    let addr = app.serve().await;
    let admin = app.token("1", Some(UserRole::Amministratore));

    let mut client = connect(addr, &app.token("2", Some(UserRole::Sorvegliante))).await;
    app.wait_for_connections(1).await;

    let response = app.request("GET", "/api/v1/connections", Some(&admin)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"][0]["subjectId"], "2");
    assert_eq!(response.body["data"][0]["role"], "sorvegliante");

    app.producer.push("Piazza Duomo, Trento");
    let response = app
        .request("POST", "/api/v1/detection/trigger", Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["produced"], true);
    assert_eq!(response.body["data"]["delivered"], 1);

    let frame = next_json(&mut client).await;
    assert_eq!(frame["locationDescriptor"], "Piazza Duomo, Trento");

    let health = app.request("GET", "/api/health", None).await;
    assert_eq!(health.body["connections"], 1);
    assert_eq!(health.body["detection"]["lastDeliveryCount"], 1);
    assert_eq!(health.body["metrics"]["deliveriesSucceeded"], 1);
}

#[tokio::test]
async fn test_stopped_emitter_stays_quiet() {
    let app = TestApp::new();
    let addr = app.serve().await;
    let mut client = connect(addr, &app.token("1", None)).await;
    app.wait_for_connections(1).await;

    app.engine.emitter.start().await;
    app.engine.emitter.stop().await;
    app.producer.push("Via Roma");

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(app.engine.emitter.status().await.ticks, 0);

    // Queued payload is still there for the next manual tick.
    app.engine.emitter.trigger().await;
    assert_eq!(next_json(&mut client).await["locationDescriptor"], "Via Roma");
}

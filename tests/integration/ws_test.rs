//! End-to-end delivery over real WebSocket connections.

use futures::SinkExt;
use tokio_tungstenite::tungstenite::Message;

use trafficwatch_entity::user::UserRole;

use crate::helpers::{TestApp, assert_silent, connect, next_json};

#[tokio::test]
async fn test_notification_reaches_connected_client() {
    let app = TestApp::new();
    let addr = app.serve().await;
    let token = app.token("1", Some(UserRole::Sorvegliante));

    let mut client = connect(addr, &token).await;
    app.wait_for_connections(1).await;

    app.producer.push("Via Verdi, 123 Trento");
    let report = app.engine.emitter.trigger().await;
    assert!(report.produced);
    assert_eq!(report.delivered, 1);

    let frame = next_json(&mut client).await;
    assert_eq!(frame["type"], "notification");
    assert_eq!(frame["kind"], "incidente");
    assert_eq!(frame["severity"], "media");
    assert_eq!(frame["locationDescriptor"], "Via Verdi, 123 Trento");
    assert_eq!(frame["title"], "Detected incident");
    assert!(frame["occurredAt"].is_string());
}

#[tokio::test]
async fn test_empty_tick_sends_nothing() {
    let app = TestApp::new();
    let addr = app.serve().await;
    let token = app.token("1", None);

    let mut client = connect(addr, &token).await;
    app.wait_for_connections(1).await;

    let report = app.engine.emitter.trigger().await;
    assert!(!report.produced);
    assert_eq!(report.attempted, 0);
    assert_silent(&mut client).await;
}

#[tokio::test]
async fn test_removed_client_misses_later_notifications() {
    let app = TestApp::new();
    let addr = app.serve().await;

    let mut a = connect(addr, &app.token("a", Some(UserRole::Sorvegliante))).await;
    let mut b = connect(addr, &app.token("b", Some(UserRole::Amministratore))).await;
    app.wait_for_connections(2).await;

    app.producer.push("P");
    let report = app.engine.emitter.trigger().await;
    assert_eq!(report.attempted, 2);
    assert_eq!(next_json(&mut a).await["locationDescriptor"], "P");
    assert_eq!(next_json(&mut b).await["locationDescriptor"], "P");

    b.close(None).await.unwrap();
    app.wait_for_connections(1).await;

    app.producer.push("Q");
    let report = app.engine.emitter.trigger().await;
    assert_eq!(report.attempted, 1);
    assert_eq!(report.delivered, 1);
    assert_eq!(next_json(&mut a).await["locationDescriptor"], "Q");
}

#[tokio::test]
async fn test_ping_and_identify() {
    let app = TestApp::new();
    let addr = app.serve().await;
    let mut client = connect(addr, &app.token("1", None)).await;
    app.wait_for_connections(1).await;

    client
        .send(Message::text(r#"{"type":"identify","data":{"client":"dashboard"}}"#))
        .await
        .unwrap();
    client
        .send(Message::text(r#"{"type":"ping"}"#))
        .await
        .unwrap();
    assert_eq!(next_json(&mut client).await["type"], "pong");

    client.send(Message::text("{oops")).await.unwrap();
    let frame = next_json(&mut client).await;
    assert_eq!(frame["type"], "error");
    assert_eq!(frame["code"], "INVALID_MESSAGE");
}

#[tokio::test]
async fn test_shutdown_disconnects_clients() {
    let app = TestApp::new();
    let addr = app.serve().await;
    let mut client = connect(addr, &app.token("1", None)).await;
    app.wait_for_connections(1).await;

    app.engine.shutdown().await.unwrap();
    assert!(app.engine.registry.is_empty());

    let closed = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        use futures::StreamExt;
        loop {
            match client.next().await {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => {}
            }
        }
    })
    .await;
    assert!(closed.is_ok());
}

//! Shared test helpers for integration tests.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use chrono::Utc;
use futures::StreamExt;
use http::{Request, StatusCode};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tower::ServiceExt;

use trafficwatch_api::AppState;
use trafficwatch_auth::jwt::{JwtDecoder, JwtEncoder};
use trafficwatch_core::config::AppConfig;
use trafficwatch_core::error::AppError;
use trafficwatch_entity::event::{EventKind, Severity};
use trafficwatch_entity::user::UserRole;
use trafficwatch_realtime::{Notification, NotificationProducer, RealtimeEngine};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Producer fed by the test; yields nothing once its queue is empty.
#[derive(Default)]
pub struct QueuedProducer {
    queue: Mutex<VecDeque<Notification>>,
}

impl QueuedProducer {
    /// Queues a notification for the next tick.
    pub fn push(&self, location: &str) {
        let notification =
            Notification::new(EventKind::Incidente, Utc::now(), location, Severity::Media)
                .with_detail("title", "Detected incident");
        self.queue.lock().unwrap().push_back(notification);
    }
}

#[async_trait]
impl NotificationProducer for QueuedProducer {
    fn name(&self) -> &str {
        "queued"
    }

    async fn produce(&self) -> Result<Option<Notification>, AppError> {
        Ok(self.queue.lock().unwrap().pop_front())
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Gateway engine behind the router
    pub engine: Arc<RealtimeEngine>,
    /// Producer the emitter polls
    pub producer: Arc<QueuedProducer>,
    /// Token issuer sharing the server's secret
    pub encoder: JwtEncoder,
}

/// Response captured from a oneshot request.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    /// Create a new test application with the schedule stopped.
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.detection.enabled = false;
        config.detection.simulated_latency_ms = 0;

        let decoder = Arc::new(JwtDecoder::new(&config.auth).expect("decoder"));
        let encoder = JwtEncoder::new(&config.auth).expect("encoder");
        let producer = Arc::new(QueuedProducer::default());
        let engine = Arc::new(RealtimeEngine::new(
            &config.realtime,
            &config.detection,
            Arc::clone(&decoder),
            producer.clone(),
        ));

        let state = AppState::new(config, decoder, Arc::clone(&engine));
        let router = trafficwatch_api::build_app(state);

        Self {
            router,
            engine,
            producer,
            encoder,
        }
    }

    /// Issues a valid token for the given role.
    pub fn token(&self, subject: &str, role: Option<UserRole>) -> String {
        self.encoder
            .issue(subject, &format!("{subject}@comune.tn.it"), role)
            .expect("token")
    }

    /// Make a request through the router without a network socket.
    pub async fn request(&self, method: &str, uri: &str, token: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = builder.body(Body::empty()).expect("request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Serves the router on an ephemeral local port.
    pub async fn serve(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve");
        });
        addr
    }

    /// Waits until the registry holds exactly `expected` connections.
    pub async fn wait_for_connections(&self, expected: usize) {
        let registry = &self.engine.registry;
        tokio::time::timeout(Duration::from_secs(5), async {
            while registry.len() != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| {
            panic!(
                "expected {expected} connections, registry has {}",
                registry.len()
            )
        });
    }
}

/// Opens a WebSocket passing the token as a query parameter.
pub async fn connect(addr: SocketAddr, token: &str) -> WsClient {
    let (client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws?token={token}"))
        .await
        .expect("handshake");
    client
}

/// Next JSON text frame from the server.
pub async fn next_json(client: &mut WsClient) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("frame within timeout")
            .expect("stream open")
            .expect("valid frame");

        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).expect("json frame");
        }
    }
}

/// Asserts that no text frame arrives within a short window.
pub async fn assert_silent(client: &mut WsClient) {
    let outcome = tokio::time::timeout(Duration::from_millis(200), client.next()).await;
    if let Ok(Some(Ok(Message::Text(text)))) = outcome {
        panic!("unexpected frame: {text}");
    }
}

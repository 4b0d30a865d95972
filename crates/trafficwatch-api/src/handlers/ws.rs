//! WebSocket upgrade handler.

use std::time::Duration;

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum_extra::TypedHeader;
use axum_extra::headers::UserAgent;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use trafficwatch_realtime::connection::AuthenticatedConnection;

use crate::error::ApiError;
use crate::extractors::{TokenQuery, request_token};
use crate::state::AppState;

/// How long the writer may take to flush its close frame.
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// GET /ws: authenticated WebSocket upgrade.
///
/// The credential is checked before the upgrade; a rejected handshake gets
/// a 401 JSON body and never reaches the registry.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TokenQuery>,
    user_agent: Option<TypedHeader<UserAgent>>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, ApiError> {
    let identity = state
        .realtime
        .authenticate(request_token(&headers, &query))?;

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    debug!(
        subject_id = %identity.subject_id,
        user_agent = user_agent.as_ref().map(|TypedHeader(ua)| ua.as_str()),
        "Upgrading WebSocket"
    );

    Ok(ws.on_upgrade(move |socket| handle_ws_connection(state, identity, socket)))
}

/// Handles an established WebSocket connection.
async fn handle_ws_connection(
    state: AppState,
    identity: AuthenticatedConnection,
    socket: WebSocket,
) {
    let registry = state.realtime.registry.clone();
    let (handle, mut outbound_rx) = match registry.register(identity) {
        Ok(registered) => registered,
        Err(e) => {
            warn!(error = %e, "Failed to register WebSocket connection");
            return;
        }
    };
    let conn_id = handle.id;

    let (mut ws_tx, mut ws_rx) = socket.split();

    // Outbound forwarder: drains the connection's queue until it is closed.
    let writer_handle = handle.clone();
    let mut writer = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = writer_handle.closed() => break,
                frame = outbound_rx.recv() => match frame {
                    Some(frame) => {
                        if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }
        let _ = ws_tx.send(Message::Close(None)).await;
    });

    let writer_finished = loop {
        tokio::select! {
            _ = &mut writer => break true,
            incoming = ws_rx.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if let Err(e) = state.realtime.handle_inbound(&handle, text.as_str()) {
                        debug!(conn_id = %conn_id, error = %e, "Failed to answer client message");
                    }
                }
                Some(Ok(Message::Close(_))) | None => break false,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                    break false;
                }
            },
        }
    };

    registry.remove(&conn_id);

    if !writer_finished && tokio::time::timeout(WRITER_DRAIN_TIMEOUT, writer).await.is_err() {
        debug!(conn_id = %conn_id, "WebSocket writer did not drain in time");
    }

    info!(conn_id = %conn_id, "WebSocket connection closed");
}

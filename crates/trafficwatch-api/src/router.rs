//! Route definitions for the TrafficWatch HTTP API.

use axum::Router;
use axum::routing::{get, post};

use crate::handlers;
use crate::state::AppState;

/// Build the Axum router with all routes.
///
/// The WebSocket path comes from `realtime.ws_path`; REST routes live under `/api`.
pub fn build_router(state: AppState) -> Router {
    let ws_path = state.config.realtime.ws_path.clone();

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(detection_routes());

    Router::new()
        .nest("/api", api_routes)
        .route(&ws_path, get(handlers::ws::ws_upgrade))
        .with_state(state)
}

/// Liveness and gateway counters
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Admin-only detection control
fn detection_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/detection", get(handlers::detection::status))
        .route("/v1/detection/start", post(handlers::detection::start))
        .route("/v1/detection/stop", post(handlers::detection::stop))
        .route("/v1/detection/trigger", post(handlers::detection::trigger))
        .route("/v1/connections", get(handlers::detection::connections))
}

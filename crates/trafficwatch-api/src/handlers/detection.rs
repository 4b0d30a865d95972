//! Admin detection control handlers.

use axum::Json;
use axum::extract::State;
use serde_json::json;
use tracing::info;

use trafficwatch_realtime::connection::ConnectionInfo;
use trafficwatch_realtime::detection::{EmitterStatus, TickReport};

use crate::dto::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/v1/detection
pub async fn status(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<EmitterStatus>>, ApiError> {
    require_admin(&state, &auth)?;
    Ok(Json(ApiResponse::ok(state.realtime.emitter.status().await)))
}

/// POST /api/v1/detection/start
pub async fn start(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&state, &auth)?;
    let changed = state.realtime.emitter.start().await;
    info!(subject_id = %auth.id, changed, "Detection start requested");

    Ok(Json(json!({
        "success": true,
        "data": { "changed": changed, "status": state.realtime.emitter.status().await }
    })))
}

/// POST /api/v1/detection/stop
pub async fn stop(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&state, &auth)?;
    let changed = state.realtime.emitter.stop().await;
    info!(subject_id = %auth.id, changed, "Detection stop requested");

    Ok(Json(json!({
        "success": true,
        "data": { "changed": changed, "status": state.realtime.emitter.status().await }
    })))
}

/// POST /api/v1/detection/trigger
pub async fn trigger(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<TickReport>>, ApiError> {
    require_admin(&state, &auth)?;
    info!(subject_id = %auth.id, "Manual detection requested");
    Ok(Json(ApiResponse::ok(state.realtime.emitter.trigger().await)))
}

/// GET /api/v1/connections
pub async fn connections(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<ConnectionInfo>>>, ApiError> {
    require_admin(&state, &auth)?;
    Ok(Json(ApiResponse::ok(state.realtime.registry.infos())))
}

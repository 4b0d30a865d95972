//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use trafficwatch_auth::jwt::JwtDecoder;
use trafficwatch_auth::rbac::RbacEnforcer;
use trafficwatch_core::config::AppConfig;
use trafficwatch_realtime::RealtimeEngine;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Role-based access control enforcer
    pub rbac_enforcer: Arc<RbacEnforcer>,
    /// Gateway engine (registry and emitter)
    pub realtime: Arc<RealtimeEngine>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("realtime", &self.realtime)
            .finish()
    }
}

impl AppState {
    /// Assembles the state from its parts.
    pub fn new(
        config: AppConfig,
        jwt_decoder: Arc<JwtDecoder>,
        realtime: Arc<RealtimeEngine>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            jwt_decoder,
            rbac_enforcer: Arc::new(RbacEnforcer::new()),
            realtime,
        }
    }
}

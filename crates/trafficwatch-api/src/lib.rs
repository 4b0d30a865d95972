//! # trafficwatch-api
//!
//! HTTP API layer for TrafficWatch built on Axum.
//!
//! Provides the authenticated WebSocket upgrade, health reporting, the
//! admin-only detection control routes, extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;

//! Custom Axum extractors.

pub mod auth;

pub use auth::{AuthUser, TokenQuery, request_token};

//! # trafficwatch-auth
//!
//! Credential handling for the TrafficWatch platform.
//!
//! ## Modules
//!
//! - `jwt`: token claims, signing, and verification
//! - `token`: locating the bearer credential in a request or handshake
//! - `rbac`: role checks for guarded routes

pub mod jwt;
pub mod rbac;
pub mod token;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use rbac::RbacEnforcer;

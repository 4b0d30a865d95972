//! # trafficwatch-core
//!
//! Core crate for TrafficWatch. Contains the configuration schemas and the
//! unified error system shared by every other crate in the workspace.
//!
//! This crate has **no** internal dependencies on other TrafficWatch crates.

pub mod config;
pub mod error;

pub use error::AppError;

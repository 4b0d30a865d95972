//! Route handlers organized by domain.

pub mod detection;
pub mod health;
pub mod ws;

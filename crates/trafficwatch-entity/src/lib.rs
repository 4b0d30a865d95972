//! # trafficwatch-entity
//!
//! Domain entity models for TrafficWatch: traffic events reported by the
//! detection pipeline and the roles of the municipal staff who watch them.
//! All entities derive `Debug`, `Clone`, `Serialize` and `Deserialize`.

pub mod event;
pub mod user;

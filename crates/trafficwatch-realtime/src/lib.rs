//! # trafficwatch-realtime
//!
//! Live notification gateway for TrafficWatch. Provides:
//!
//! - WebSocket credential checks before a connection is admitted
//! - An in-memory registry of open, authenticated connections
//! - A periodic detection emitter that fans notifications out to every
//!   registered connection
//! - Gateway counters for health reporting

pub mod connection;
pub mod detection;
pub mod message;
pub mod metrics;
pub mod notification;
pub mod server;

pub use connection::authenticator::WsAuthenticator;
pub use connection::registry::ConnectionRegistry;
pub use detection::emitter::BroadcastEmitter;
pub use detection::producer::NotificationProducer;
pub use notification::Notification;
pub use server::RealtimeEngine;

//! Periodic detection and broadcast.

pub mod emitter;
pub mod producer;
pub mod synthetic;

pub use emitter::{BroadcastEmitter, EmitterState, EmitterStatus, TickReport};
pub use producer::NotificationProducer;
pub use synthetic::SyntheticDetector;

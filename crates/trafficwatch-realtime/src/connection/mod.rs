//! WebSocket connection management.

pub mod authenticator;
pub mod handle;
pub mod registry;

pub use authenticator::{AuthenticatedConnection, WsAuthenticator};
pub use handle::{ConnectionHandle, ConnectionId, ConnectionInfo};
pub use registry::ConnectionRegistry;

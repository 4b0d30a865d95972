//! Workspace integration tests: the HTTP router in-process and real
//! WebSocket clients against a bound listener.

mod helpers;

mod auth_test;
mod detection_test;
mod ws_test;

//! WebSocket transport: upgrade handling and per-connection I/O.
//!
//! The endpoint at `/ws` upgrades to a WebSocket, wraps the socket in a
//! [`connection::WsConnection`], registers it with the
//! [`crate::domain::ConnectionRegistry`] and streams every broadcast
//! notification to the client until either side closes.

pub mod connection;
pub mod handler;
pub mod messages;

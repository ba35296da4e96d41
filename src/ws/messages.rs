//! Messages a dashboard client may send over the WebSocket, and the
//! server-originated control messages.

use serde::Deserialize;
use serde_json::json;

use crate::domain::{ConnectionId, Notification};

/// Client → server message. The stream is push-only apart from liveness
/// checks, so `ping` is the only recognised command.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Application-level liveness probe, answered with `pong`.
    Ping {
        /// Optional client correlation ID, echoed back.
        #[serde(default)]
        id: Option<String>,
    },
}

/// First message on every stream, sent once the connection is registered.
#[must_use]
pub fn connected(connection_id: ConnectionId) -> Notification {
    Notification::new("connected", json!({ "connection_id": connection_id }))
}

/// Reply to a client `ping`.
#[must_use]
pub fn pong(id: Option<String>) -> Notification {
    Notification::new("pong", json!({ "id": id }))
}

/// Parses a client text frame into the reply it warrants, if any.
#[must_use]
pub fn reply_to(text: &str) -> Option<Notification> {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::Ping { id }) => Some(pong(id)),
        Err(err) => {
            tracing::debug!(error = %err, "ignoring unsupported client message");
            None
        }
    }
}

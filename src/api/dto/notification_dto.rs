//! Request and response DTOs for notification publishing and diagnostics.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Longest accepted notification `type`.
pub const MAX_KIND_LEN: usize = 64;

/// `POST /api/v1/notifications` request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PublishNotificationRequest {
    /// Notification type discriminator (e.g. `"new_order"`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Opaque payload forwarded verbatim to subscribers.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
}

/// `POST /api/v1/notifications` response body.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublishNotificationResponse {
    /// ID assigned to the broadcast notification.
    pub message_id: uuid::Uuid,
    /// Connections the notification was delivered to.
    pub success: usize,
    /// Connections that failed and were evicted.
    pub failure: usize,
}

/// `GET /api/v1/connections` response body.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConnectionCountResponse {
    /// Number of currently active subscriber connections.
    pub active_connections: usize,
}

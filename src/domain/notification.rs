//! Notification envelope and its pre-encoded wire form.
//!
//! A [`Notification`] is the message producers hand to the dispatcher. The
//! dispatcher never looks inside `payload`; it encodes the envelope once per
//! broadcast into a [`Frame`] and shares that frame with every connection.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

/// Outbound notification envelope.
///
/// Serialized as:
/// ```json
/// {"id": "…", "type": "new_order", "timestamp": "…", "payload": {…}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Server-generated message ID.
    pub id: uuid::Uuid,
    /// Message type discriminator (e.g. `"new_order"`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Creation timestamp.
    pub timestamp: DateTime<Utc>,
    /// Opaque, producer-defined body.
    pub payload: serde_json::Value,
}

impl Notification {
    /// Creates a notification stamped with a fresh ID and the current time.
    #[must_use]
    pub fn new(kind: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            kind: kind.into(),
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Serializes the envelope into a shareable [`Frame`].
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Encode`] if the payload cannot be rendered as
    /// JSON.
    pub fn encode(&self) -> Result<Frame, NotifyError> {
        let json = serde_json::to_string(self)?;
        Ok(Frame(Arc::from(json)))
    }
}

/// A JSON-encoded notification, cheap to clone across connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame(Arc<str>);

impl Frame {
    /// Returns the encoded JSON text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encodes_type_discriminator() {
        let n = Notification::new("new_order", json!({"id": 42}));
        let Ok(frame) = n.encode() else {
            panic!("encoding failed");
        };
        let Ok(value) = serde_json::from_str::<serde_json::Value>(frame.as_str()) else {
            panic!("frame is not JSON");
        };
        assert_eq!(value["type"], "new_order");
        assert_eq!(value["payload"]["id"], 42);
        assert_eq!(value["id"], n.id.to_string());
    }

    #[test]
    fn payload_is_forwarded_verbatim() {
        let payload = json!({"nested": {"list": [1, 2, 3]}, "flag": null});
        let n = Notification::new("custom", payload.clone());
        let Ok(frame) = n.encode() else {
            panic!("encoding failed");
        };
        let Ok(decoded) = serde_json::from_str::<Notification>(frame.as_str()) else {
            panic!("decode failed");
        };
        assert_eq!(decoded.payload, payload);
        assert_eq!(decoded.kind, "custom");
    }

    #[test]
    fn fresh_ids_per_notification() {
        let a = Notification::new("x", json!({}));
        let b = Notification::new("x", json!({}));
        assert_ne!(a.id, b.id);
    }
}

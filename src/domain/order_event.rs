//! Order events produced by the order-management backend.
//!
//! After an order mutation commits, the producer builds an [`OrderEvent`]
//! and converts it into a [`Notification`] for broadcast. The variant name
//! becomes the notification `type`; the variant fields become its `payload`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Notification;
use crate::error::NotifyError;

/// Production status of a print-shop order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Received, not yet started.
    Pending,
    /// On the press or in finishing.
    InProduction,
    /// Printed and waiting for pickup or shipping.
    Ready,
    /// Handed over to the customer.
    Delivered,
    /// Cancelled before delivery.
    Cancelled,
}

/// Order fields shown on staff dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Order primary key in the backend database.
    pub order_id: i64,
    /// Customer display name.
    pub customer_name: String,
    /// Product name (e.g. `"A5 flyers, 300gsm"`).
    pub product: String,
    /// Number of units ordered.
    pub quantity: u32,
    /// Order total in the smallest currency unit.
    pub total_cents: i64,
    /// Current production status.
    pub status: OrderStatus,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

/// Order-state change worth pushing to live dashboards.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OrderEvent {
    /// A new order was placed.
    NewOrder(OrderSummary),

    /// Order details (quantity, product, total…) were edited.
    OrderUpdated(OrderSummary),

    /// The order moved to another production status.
    OrderStatusChanged {
        /// Order primary key.
        order_id: i64,
        /// Status before the change.
        old_status: OrderStatus,
        /// Status after the change.
        new_status: OrderStatus,
        /// Time of the change.
        changed_at: DateTime<Utc>,
    },

    /// The order was cancelled.
    OrderCancelled {
        /// Order primary key.
        order_id: i64,
        /// Optional staff-entered reason.
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        /// Time of cancellation.
        cancelled_at: DateTime<Utc>,
    },
}

impl OrderEvent {
    /// Returns the notification `type` for this event.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NewOrder(_) => "new_order",
            Self::OrderUpdated(_) => "order_updated",
            Self::OrderStatusChanged { .. } => "order_status_changed",
            Self::OrderCancelled { .. } => "order_cancelled",
        }
    }

    /// Returns the order this event refers to.
    #[must_use]
    pub const fn order_id(&self) -> i64 {
        match self {
            Self::NewOrder(summary) | Self::OrderUpdated(summary) => summary.order_id,
            Self::OrderStatusChanged { order_id, .. } | Self::OrderCancelled { order_id, .. } => {
                *order_id
            }
        }
    }
}

impl TryFrom<&OrderEvent> for Notification {
    type Error = NotifyError;

    fn try_from(event: &OrderEvent) -> Result<Self, Self::Error> {
        let payload = serde_json::to_value(event)?;
        Ok(Self::new(event.kind(), payload))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn summary(order_id: i64) -> OrderSummary {
        OrderSummary {
            order_id,
            customer_name: "Ada Print Co".to_string(),
            product: "Business cards".to_string(),
            quantity: 500,
            total_cents: 4_990,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn new_order_becomes_flat_payload() {
        let event = OrderEvent::NewOrder(summary(42));
        let Ok(n) = Notification::try_from(&event) else {
            panic!("conversion failed");
        };
        assert_eq!(n.kind, "new_order");
        assert_eq!(n.payload["order_id"], 42);
        assert_eq!(n.payload["status"], "pending");
        assert_eq!(n.payload["quantity"], 500);
    }

    #[test]
    fn status_change_payload() {
        let event = OrderEvent::OrderStatusChanged {
            order_id: 7,
            old_status: OrderStatus::Pending,
            new_status: OrderStatus::InProduction,
            changed_at: Utc::now(),
        };
        let Ok(n) = Notification::try_from(&event) else {
            panic!("conversion failed");
        };
        assert_eq!(n.kind, "order_status_changed");
        assert_eq!(n.payload["new_status"], "in_production");
        assert_eq!(event.order_id(), 7);
    }

    #[test]
    fn cancelled_without_reason_omits_field() {
        let event = OrderEvent::OrderCancelled {
            order_id: 3,
            reason: None,
            cancelled_at: Utc::now(),
        };
        let Ok(n) = Notification::try_from(&event) else {
            panic!("conversion failed");
        };
        assert!(n.payload.get("reason").is_none());
        assert_eq!(event.kind(), "order_cancelled");
    }
}

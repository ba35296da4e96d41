//! Domain layer: connections, the connection registry, and notifications.
//!
//! This module contains the server-side model of a live subscriber
//! (identity, lifecycle, transport capabilities), the registry that owns
//! every active subscriber, and the notification envelope that order
//! events are converted into.

pub mod connection;
pub mod connection_id;
pub mod connection_registry;
pub mod notification;
pub mod order_event;

pub use connection::{Connection, ConnectionHandle, ConnectionState};
pub use connection_id::ConnectionId;
pub use connection_registry::ConnectionRegistry;
pub use notification::{Frame, Notification};
pub use order_event::{OrderEvent, OrderStatus, OrderSummary};

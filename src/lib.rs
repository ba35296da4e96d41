//! # order-notify
//!
//! Real-time order notification broadcaster for the print-shop backend.
//!
//! Staff dashboards subscribe over WebSocket; the order-management backend
//! publishes an event after every committed order change, and the
//! broadcaster fans it out to every live subscriber. Order CRUD,
//! authentication and persistence live elsewhere; this service only
//! tracks connections and delivers notifications.
//!
//! ## Architecture
//!
//! ```text
//! Dashboards (WebSocket)        Order backend (HTTP / in-process)
//!     │                                  │
//!     ├── WS Handler (ws/)               ├── REST Handlers (api/)
//!     │                                  │
//!     │                          BroadcastDispatcher (service/)
//!     │                                  │
//!     └────────► ConnectionRegistry (domain/) ◄┘
//! ```
//!
//! Delivery is best-effort and at-most-once: the dispatcher snapshots the
//! registry, sends to each connection with a bounded timeout, and evicts
//! the connections that failed.

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;

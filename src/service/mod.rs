//! Service layer: notification fan-out.
//!
//! [`BroadcastDispatcher`] snapshots the [`super::domain::ConnectionRegistry`],
//! delivers each notification to every connection and evicts the ones that
//! failed.

pub mod broadcast_dispatcher;

pub use broadcast_dispatcher::{BroadcastDispatcher, BroadcastOutcome};

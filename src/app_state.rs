//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::ConnectionRegistry;
use crate::service::BroadcastDispatcher;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registry of live subscriber connections.
    pub registry: Arc<ConnectionRegistry>,
    /// Fan-out dispatcher used by producers.
    pub dispatcher: Arc<BroadcastDispatcher>,
    /// Capacity of each WebSocket connection's outbound queue.
    pub ws_outbound_buffer: usize,
}

impl AppState {
    /// Builds the registry/dispatcher pair and wraps them in shared state.
    #[must_use]
    pub fn new(send_timeout: std::time::Duration, ws_outbound_buffer: usize) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = Arc::new(BroadcastDispatcher::new(
            Arc::clone(&registry),
            send_timeout,
        ));
        Self {
            registry,
            dispatcher,
            ws_outbound_buffer,
        }
    }
}

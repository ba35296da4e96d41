//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;

/// `GET /ws` — Upgrade HTTP connection to a notification stream.
///
/// Authentication happens upstream; by the time the upgrade reaches this
/// handler the subscriber is trusted.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let registry = Arc::clone(&state.registry);
    let buffer = state.ws_outbound_buffer;
    let write_timeout = state.dispatcher.send_timeout();

    ws.on_upgrade(move |socket| run_connection(socket, registry, buffer, write_timeout))
}

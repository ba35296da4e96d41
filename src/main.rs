//! order-notify server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints and tears
//! down every subscriber connection on shutdown.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use order_notify::api;
use order_notify::app_state::AppState;
use order_notify::config::{LogFormat, NotifierConfig};
use order_notify::domain::ConnectionRegistry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = NotifierConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::info!(
        addr = %config.listen_addr,
        send_timeout = ?config.send_timeout,
        ws_outbound_buffer = config.ws_outbound_buffer,
        "starting order-notify"
    );

    // Build registry, dispatcher and shared state
    let app_state = AppState::new(config.send_timeout, config.ws_outbound_buffer);
    let registry = Arc::clone(&app_state.registry);

    let app = api::build_app(app_state, config.request_timeout);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(registry))
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM, after closing every subscriber so that
/// upgraded WebSocket connections do not hold the graceful shutdown open.
async fn shutdown_signal(registry: Arc<ConnectionRegistry>) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
    let closed = registry.close_all().await;
    tracing::info!(closed, "subscriber connections closed");
}

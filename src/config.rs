//! Notifier configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::time::Duration;

/// Log output format for `tracing-subscriber`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Top-level notifier configuration.
///
/// Loaded once at startup via [`NotifierConfig::from_env`].
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Upper bound for delivering one notification to one connection.
    pub send_timeout: Duration,

    /// Capacity of each WebSocket connection's outbound queue.
    pub ws_outbound_buffer: usize,

    /// Timeout applied to plain HTTP requests.
    pub request_timeout: Duration,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            send_timeout: Duration::from_millis(5_000),
            ws_outbound_buffer: 256,
            request_timeout: Duration::from_secs(30),
            log_format: LogFormat::Text,
        }
    }
}

impl NotifierConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to the [`Default`] values when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = match std::env::var("LISTEN_ADDR") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.listen_addr,
        };

        let send_timeout_ms = parse_env("SEND_TIMEOUT_MS", 5_000_u64).max(1);
        let ws_outbound_buffer = parse_env("WS_OUTBOUND_BUFFER", defaults.ws_outbound_buffer).max(1);
        let request_timeout_secs = parse_env("REQUEST_TIMEOUT_SECS", 30_u64);

        let log_format = match std::env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            send_timeout: Duration::from_millis(send_timeout_ms),
            ws_outbound_buffer,
            request_timeout: Duration::from_secs(request_timeout_secs),
            log_format,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

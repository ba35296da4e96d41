//! Fan-out of notifications to every registered connection.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;

use crate::domain::{ConnectionHandle, ConnectionRegistry, Frame, Notification, OrderEvent};
use crate::error::{NotifyError, SendError};

/// Aggregate result of one broadcast pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastOutcome {
    /// Connections the notification was delivered to.
    pub success: usize,
    /// Connections whose send failed; all of them were evicted.
    pub failure: usize,
}

/// Delivers notifications to all active connections.
///
/// Each pass follows the pattern: snapshot the registry → encode once →
/// send to every connection concurrently, each send bounded by
/// `send_timeout` → evict the connections that failed → return counts.
/// The registry lock is held only while the snapshot is copied.
#[derive(Debug, Clone)]
pub struct BroadcastDispatcher {
    registry: Arc<ConnectionRegistry>,
    send_timeout: Duration,
}

impl BroadcastDispatcher {
    /// Creates a dispatcher over `registry` with the given per-send bound.
    #[must_use]
    pub fn new(registry: Arc<ConnectionRegistry>, send_timeout: Duration) -> Self {
        Self {
            registry,
            send_timeout,
        }
    }

    /// Returns the per-send timeout. The WebSocket writer reuses it as the
    /// bound for a single socket write.
    #[must_use]
    pub const fn send_timeout(&self) -> Duration {
        self.send_timeout
    }

    /// Sends `notification` to every connection registered at call time.
    ///
    /// Delivery is best-effort and at-most-once: a connection whose send
    /// fails or times out is counted in `failure` and removed from the
    /// registry, and the notification is not retried. Broadcasting with no
    /// subscribers returns a zero outcome.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Encode`] if the notification cannot be
    /// serialized. Per-connection failures are never returned.
    pub async fn broadcast(
        &self,
        notification: &Notification,
    ) -> Result<BroadcastOutcome, NotifyError> {
        let snapshot = self.registry.snapshot().await;
        if snapshot.is_empty() {
            tracing::debug!(kind = %notification.kind, "no subscribers, skipping broadcast");
            return Ok(BroadcastOutcome::default());
        }

        let frame = notification.encode()?;
        let results = join_all(snapshot.iter().map(|handle| self.deliver(handle, &frame))).await;

        let mut outcome = BroadcastOutcome::default();
        let mut failed = Vec::new();
        for (handle, result) in snapshot.iter().zip(results) {
            match result {
                Ok(()) => outcome.success += 1,
                Err(err) => {
                    tracing::warn!(
                        connection_id = %handle.id(),
                        error = %err,
                        "send failed, evicting connection"
                    );
                    outcome.failure += 1;
                    failed.push(handle.id());
                }
            }
        }
        drop(snapshot);

        for id in failed {
            self.registry.disconnect(id).await;
        }

        tracing::info!(
            kind = %notification.kind,
            message_id = %notification.id,
            success = outcome.success,
            failure = outcome.failure,
            "broadcast complete"
        );
        Ok(outcome)
    }

    /// Converts an order event into a notification and broadcasts it.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Encode`] if the event cannot be serialized.
    pub async fn publish_order_event(
        &self,
        event: &OrderEvent,
    ) -> Result<BroadcastOutcome, NotifyError> {
        let notification = Notification::try_from(event)?;
        tracing::debug!(
            order_id = event.order_id(),
            kind = event.kind(),
            "publishing order event"
        );
        self.broadcast(&notification).await
    }

    async fn deliver(&self, handle: &ConnectionHandle, frame: &Frame) -> Result<(), SendError> {
        match tokio::time::timeout(self.send_timeout, handle.send(frame)).await {
            Ok(result) => result,
            Err(_) => Err(SendError::Timeout(self.send_timeout)),
        }
    }
}

//! WebSocket subscriber connection.
//!
//! [`WsConnection`] is the [`Connection`] the registry holds for a socket:
//! `send` pushes a frame into a bounded FIFO queue, `close` signals the
//! writer. [`run_connection`] owns the socket itself and drains the queue.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::future::BoxFuture;
use futures_util::{FutureExt, Sink, SinkExt, StreamExt};
use tokio::sync::{Notify, mpsc};

use super::messages;
use crate::domain::{Connection, ConnectionHandle, ConnectionRegistry, Frame};
use crate::error::SendError;

/// Registry-side half of a WebSocket connection.
#[derive(Debug)]
pub struct WsConnection {
    outbound: mpsc::Sender<Frame>,
    shutdown: Arc<Notify>,
}

impl WsConnection {
    /// Creates the connection and the queue receiver its writer drains.
    #[must_use]
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<Frame>, Arc<Notify>) {
        let (outbound, rx) = mpsc::channel(buffer.max(1));
        let shutdown = Arc::new(Notify::new());
        let conn = Self {
            outbound,
            shutdown: Arc::clone(&shutdown),
        };
        (conn, rx, shutdown)
    }
}

impl Connection for WsConnection {
    fn send<'a>(&'a self, frame: &'a Frame) -> BoxFuture<'a, Result<(), SendError>> {
        async move {
            self.outbound
                .send(frame.clone())
                .await
                .map_err(|_| SendError::Closed)
        }
        .boxed()
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        // notify_one stores a permit, so a writer that is mid-send still
        // observes the shutdown on its next loop iteration.
        self.shutdown.notify_one();
        futures_util::future::ready(()).boxed()
    }
}

/// Runs one subscriber connection from registration to teardown.
///
/// - Registers the connection and greets the client with `connected`.
/// - Writes queued notifications to the socket in FIFO order.
/// - Answers client `ping` messages.
/// - Disconnects from the registry when the client leaves, the socket
///   errors, a write exceeds `write_timeout`, or the registry closes the
///   connection.
pub async fn run_connection(
    mut socket: WebSocket,
    registry: Arc<ConnectionRegistry>,
    buffer: usize,
    write_timeout: Duration,
) {
    let (conn, mut queue, shutdown) = WsConnection::new(buffer);
    let handle = ConnectionHandle::new(conn);
    let id = handle.id();

    if let Err(err) = registry.connect(handle).await {
        tracing::warn!(connection_id = %id, error = %err, "ws connection rejected");
        let _ = write_bounded(&mut socket, Message::Close(None), write_timeout).await;
        return;
    }
    tracing::info!(connection_id = %id, "ws subscriber connected");

    let (mut ws_tx, mut ws_rx) = socket.split();

    if let Ok(frame) = messages::connected(id).encode()
        && let Err(err) =
            write_bounded(&mut ws_tx, Message::text(frame.to_string()), write_timeout).await
    {
        tracing::debug!(connection_id = %id, error = %err, "ws greeting failed");
        registry.disconnect(id).await;
        return;
    }

    loop {
        tokio::select! {
            () = shutdown.notified() => {
                let _ = write_bounded(&mut ws_tx, Message::Close(None), write_timeout).await;
                break;
            }
            frame = queue.recv() => {
                let Some(frame) = frame else { break };
                if let Err(err) =
                    write_bounded(&mut ws_tx, Message::text(frame.to_string()), write_timeout).await
                {
                    tracing::debug!(connection_id = %id, error = %err, "ws write failed");
                    break;
                }
            }
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = messages::reply_to(text.as_str()).and_then(|n| n.encode().ok());
                        if let Some(reply) = reply
                            && write_bounded(&mut ws_tx, Message::text(reply.to_string()), write_timeout)
                                .await
                                .is_err()
                        {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(connection_id = %id, error = %err, "ws read error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    registry.disconnect(id).await;
    tracing::info!(connection_id = %id, "ws subscriber disconnected");
}

/// Writes one message to the socket, giving up after `limit`.
///
/// A peer that stops reading fills the TCP send buffer and would otherwise
/// park the writer inside `send` forever, out of reach of the shutdown
/// signal.
async fn write_bounded<S>(sink: &mut S, msg: Message, limit: Duration) -> Result<(), SendError>
where
    S: Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    match tokio::time::timeout(limit, sink.send(msg)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(SendError::Transport(err.to_string())),
        Err(_) => Err(SendError::Timeout(limit)),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::Notification;

    fn frame(id: i64) -> Frame {
        let Ok(frame) = Notification::new("x", json!({"id": id})).encode() else {
            panic!("encoding failed");
        };
        frame
    }

    #[tokio::test]
    async fn send_enqueues_in_order() {
        let (conn, mut rx, _) = WsConnection::new(8);
        let (a, b) = (frame(1), frame(2));
        assert_eq!(conn.send(&a).await, Ok(()));
        assert_eq!(conn.send(&b).await, Ok(()));
        assert_eq!(rx.recv().await, Some(a));
        assert_eq!(rx.recv().await, Some(b));
    }

    #[tokio::test]
    async fn send_after_writer_gone_is_closed() {
        let (conn, rx, _) = WsConnection::new(8);
        drop(rx);
        assert_eq!(conn.send(&frame(1)).await, Err(SendError::Closed));
    }

    #[tokio::test]
    async fn full_queue_blocks_until_drained() {
        let (conn, mut rx, _) = WsConnection::new(1);
        assert_eq!(conn.send(&frame(1)).await, Ok(()));

        let pending = tokio::time::timeout(
            Duration::from_millis(50),
            conn.send(&frame(2)),
        )
        .await;
        assert!(pending.is_err());

        assert!(rx.recv().await.is_some());
        assert_eq!(conn.send(&frame(3)).await, Ok(()));
    }

    /// Sink that accepts nothing, like a socket whose peer stopped reading.
    #[derive(Debug)]
    struct StuckSink;

    impl Sink<Message> for StuckSink {
        type Error = axum::Error;

        fn poll_ready(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<Result<(), Self::Error>> {
            std::task::Poll::Pending
        }

        fn start_send(self: std::pin::Pin<&mut Self>, _item: Message) -> Result<(), Self::Error> {
            Ok(())
        }

        fn poll_flush(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<Result<(), Self::Error>> {
            std::task::Poll::Pending
        }

        fn poll_close(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<Result<(), Self::Error>> {
            std::task::Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn write_to_stuck_peer_gives_up_after_limit() {
        let limit = Duration::from_millis(50);
        let mut sink = StuckSink;
        let started = tokio::time::Instant::now();

        let result = write_bounded(&mut sink, Message::text("x"), limit).await;

        assert_eq!(result, Err(SendError::Timeout(limit)));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn close_wakes_writer() {
        let (conn, _rx, shutdown) = WsConnection::new(1);
        conn.close().await;
        let woke = tokio::time::timeout(Duration::from_secs(1), shutdown.notified()).await;
        assert!(woke.is_ok());
    }
}

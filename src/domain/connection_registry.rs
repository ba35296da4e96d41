//! Authoritative set of active subscriber connections.
//!
//! [`ConnectionRegistry`] keeps every `Active` [`ConnectionHandle`] in a
//! `HashMap` behind a single [`tokio::sync::RwLock`]. Every operation is a
//! single-step mutation or a full-set read; the lock is never held across
//! transport I/O. Closing a transport always happens after the guard is
//! dropped.

use std::collections::HashMap;

use futures_util::future::join_all;
use tokio::sync::RwLock;

use super::{ConnectionHandle, ConnectionId};
use crate::error::NotifyError;

#[derive(Debug)]
struct RegistryState {
    active: HashMap<ConnectionId, ConnectionHandle>,
    accepting: bool,
}

/// Registry of live subscriber connections.
///
/// # Concurrency
///
/// - `connect`, `disconnect` and `close_all` take the write lock for one
///   map mutation.
/// - `count` and `snapshot` take the read lock for one map read.
/// - Transport `close` runs after the lock is released.
#[derive(Debug)]
pub struct ConnectionRegistry {
    state: RwLock<RegistryState>,
}

impl ConnectionRegistry {
    /// Creates an empty registry that accepts connections.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState {
                active: HashMap::new(),
                accepting: true,
            }),
        }
    }

    /// Registers a handle whose transport has completed its handshake.
    ///
    /// Returns `true` if the handle was added, `false` if it was already
    /// registered. The connection is visible to every later `snapshot` and
    /// `count` once this returns.
    ///
    /// # Errors
    ///
    /// - [`NotifyError::ConnectionClosed`] if the handle is already closed.
    /// - [`NotifyError::ShuttingDown`] after [`Self::close_all`]; the handle
    ///   is closed before returning.
    pub async fn connect(&self, handle: ConnectionHandle) -> Result<bool, NotifyError> {
        let id = handle.id();
        {
            let mut state = self.state.write().await;
            if state.accepting {
                if !handle.activate() {
                    return Err(NotifyError::ConnectionClosed(id));
                }
                if state.active.contains_key(&id) {
                    return Ok(false);
                }
                state.active.insert(id, handle);
                tracing::debug!(
                    connection_id = %id,
                    active = state.active.len(),
                    "connection registered"
                );
                return Ok(true);
            }
        }

        tracing::debug!(connection_id = %id, "refusing connection during shutdown");
        handle.close().await;
        Err(NotifyError::ShuttingDown)
    }

    /// Removes a connection and closes its transport.
    ///
    /// Returns `true` if the connection was registered. Disconnecting an
    /// unknown or already-evicted ID is a no-op that returns `false`.
    pub async fn disconnect(&self, id: ConnectionId) -> bool {
        let removed = {
            let mut state = self.state.write().await;
            let removed = state.active.remove(&id);
            if let Some(handle) = &removed {
                handle.mark_closed();
            }
            removed
        };

        match removed {
            Some(handle) => {
                handle.close_transport().await;
                tracing::debug!(connection_id = %id, "connection closed");
                true
            }
            None => false,
        }
    }

    /// Returns the number of active connections.
    pub async fn count(&self) -> usize {
        self.state.read().await.active.len()
    }

    /// Returns `true` if `id` is currently registered.
    pub async fn contains(&self, id: ConnectionId) -> bool {
        self.state.read().await.active.contains_key(&id)
    }

    /// Copies the current connection set.
    ///
    /// The copy is independent of the registry: later connects and
    /// disconnects do not affect it.
    pub async fn snapshot(&self) -> Vec<ConnectionHandle> {
        self.state.read().await.active.values().cloned().collect()
    }

    /// Stops accepting connections and closes every registered one.
    ///
    /// Returns the number of connections closed. Later calls return `0`.
    pub async fn close_all(&self) -> usize {
        let drained: Vec<ConnectionHandle> = {
            let mut state = self.state.write().await;
            state.accepting = false;
            state
                .active
                .drain()
                .map(|(_, handle)| handle)
                .filter(ConnectionHandle::mark_closed)
                .collect()
        };

        join_all(drained.iter().map(|handle| handle.close_transport())).await;
        if !drained.is_empty() {
            tracing::info!(closed = drained.len(), "closed all subscriber connections");
        }
        drained.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

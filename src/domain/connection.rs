//! Subscriber connection handles.
//!
//! A transport implements [`Connection`] (send a frame, close). The
//! transport wraps it in a [`ConnectionHandle`], which adds a unique
//! [`ConnectionId`] and the `Pending → Active → Closed` lifecycle shared by
//! every clone of the handle.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use futures_util::future::BoxFuture;

use super::{ConnectionId, Frame};
use crate::error::SendError;

/// Send and close capabilities of one live, already-authenticated
/// subscriber transport.
pub trait Connection: Send + Sync + fmt::Debug {
    /// Delivers one encoded frame.
    ///
    /// Implementations must preserve call order for a single connection.
    fn send<'a>(&'a self, frame: &'a Frame) -> BoxFuture<'a, Result<(), SendError>>;

    /// Releases the transport. Called at most once per handle.
    fn close(&self) -> BoxFuture<'_, ()>;
}

/// Lifecycle state of a connection as seen by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Created by the transport, not yet registered.
    Pending,
    /// Registered and receiving broadcasts.
    Active,
    /// Disconnected or evicted. Terminal.
    Closed,
}

const PENDING: u8 = 0;
const ACTIVE: u8 = 1;
const CLOSED: u8 = 2;

struct HandleInner {
    id: ConnectionId,
    state: AtomicU8,
    transport: Box<dyn Connection>,
}

/// Shared handle to one subscriber connection.
///
/// Clones refer to the same connection: same ID, same lifecycle state.
pub struct ConnectionHandle {
    inner: Arc<HandleInner>,
}

impl ConnectionHandle {
    /// Wraps a transport in a fresh `Pending` handle with a new identity.
    #[must_use]
    pub fn new<C>(transport: C) -> Self
    where
        C: Connection + 'static,
    {
        Self {
            inner: Arc::new(HandleInner {
                id: ConnectionId::new(),
                state: AtomicU8::new(PENDING),
                transport: Box::new(transport),
            }),
        }
    }

    /// Returns the connection identity.
    #[must_use]
    pub fn id(&self) -> ConnectionId {
        self.inner.id
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        match self.inner.state.load(Ordering::Acquire) {
            PENDING => ConnectionState::Pending,
            ACTIVE => ConnectionState::Active,
            _ => ConnectionState::Closed,
        }
    }

    /// Returns `true` once the handle has reached `Closed`.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state() == ConnectionState::Closed
    }

    /// Sends a frame through the transport.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Closed`] without touching the transport if the
    /// handle is already closed, otherwise whatever the transport reports.
    pub async fn send(&self, frame: &Frame) -> Result<(), SendError> {
        if self.is_closed() {
            return Err(SendError::Closed);
        }
        self.inner.transport.send(frame).await
    }

    /// Closes the handle and releases the transport.
    ///
    /// Idempotent: only the first call reaches the transport.
    pub async fn close(&self) {
        if self.mark_closed() {
            self.close_transport().await;
        }
    }

    /// `Pending → Active`. Returns `false` if the handle is already closed.
    pub(crate) fn activate(&self) -> bool {
        match self.inner.state.compare_exchange(
            PENDING,
            ACTIVE,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) | Err(ACTIVE) => true,
            Err(_) => false,
        }
    }

    /// Moves the handle to `Closed`. Returns `true` if this call made the
    /// transition.
    pub(crate) fn mark_closed(&self) -> bool {
        self.inner.state.swap(CLOSED, Ordering::AcqRel) != CLOSED
    }

    pub(crate) async fn close_transport(&self) {
        self.inner.transport.close().await;
    }
}

impl Clone for ConnectionHandle {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("id", &self.inner.id)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

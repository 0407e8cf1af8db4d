//! Per-connection identity and send capability.

use std::fmt;

use axum::extract::ws::Utf8Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use relay_common::snowflake::snowflake_timestamp;

/// Identity of one live WebSocket connection (a snowflake, so ids sort in
/// acceptance order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(i64);

impl ConnectionId {
    pub fn get(self) -> i64 {
        self.0
    }

    /// When the connection was accepted.
    pub fn accepted_at(self) -> DateTime<Utc> {
        snowflake_timestamp(self.0)
    }
}

impl From<i64> for ConnectionId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn_{}", self.0)
    }
}

/// Receiving end of a connection's outbound queue, drained by its event loop.
pub type Outbound = mpsc::UnboundedReceiver<Utf8Bytes>;

/// Cloneable handle used to push frames to one client.
///
/// Frames are queued, never written directly, so a slow socket only delays
/// its own client. The queue closes once the connection's event loop exits.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<Utf8Bytes>,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId) -> (Self, Outbound) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { id, tx }, rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue a frame. Returns `false` if the connection is gone.
    pub fn send(&self, frame: Utf8Bytes) -> bool {
        self.tx.send(frame).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl PartialEq for ConnectionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ConnectionHandle {}

//! Room membership and fan-out.
//!
//! One `RoomRouter` per server process, owned by the application state and
//! handed to every connection task. All shared mutation lives behind its
//! map; connection tasks never share anything else.

use dashmap::DashMap;
use std::collections::HashSet;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};
use uuid::Uuid;

/// Opaque per-connection identity, minted at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

struct ConnectionEntry {
    user_id: String,
    rooms: HashSet<i64>,
    outbound: UnboundedSender<String>,
}

/// Registry of live connections and their room memberships.
#[derive(Default)]
pub struct RoomRouter {
    connections: DashMap<ConnectionId, ConnectionEntry>,
}

impl RoomRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an authenticated connection with its outbound channel.
    pub fn register(&self, user_id: &str, outbound: UnboundedSender<String>) -> ConnectionId {
        let id = ConnectionId(Uuid::new_v4());
        self.connections.insert(
            id,
            ConnectionEntry {
                user_id: user_id.to_string(),
                rooms: HashSet::new(),
                outbound,
            },
        );
        id
    }

    /// Drop a connection and all of its memberships.
    pub fn unregister(&self, id: ConnectionId) {
        self.connections.remove(&id);
    }

    /// Add the connection to a room's fan-out set. Idempotent.
    pub fn join(&self, id: ConnectionId, room_id: i64) {
        if let Some(mut entry) = self.connections.get_mut(&id) {
            if entry.rooms.insert(room_id) {
                debug!(connection = %id, room_id, "joined room");
            }
        }
    }

    /// Remove the connection from a room's fan-out set. Leaving a room the
    /// connection is not in is a no-op.
    pub fn leave(&self, id: ConnectionId, room_id: i64) {
        if let Some(mut entry) = self.connections.get_mut(&id) {
            entry.rooms.remove(&room_id);
        }
    }

    pub fn is_member(&self, id: ConnectionId, room_id: i64) -> bool {
        self.connections
            .get(&id)
            .map(|entry| entry.rooms.contains(&room_id))
            .unwrap_or(false)
    }

    pub fn user_id(&self, id: ConnectionId) -> Option<String> {
        self.connections.get(&id).map(|e| e.user_id.clone())
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Deliver a frame to every member of the room except the sender.
    ///
    /// Best-effort: a peer whose channel is gone is skipped with a log
    /// line. Returns the delivered count.
    pub fn fan_out(&self, room_id: i64, sender: ConnectionId, frame: &str) -> usize {
        let mut delivered = 0;
        for entry in self.connections.iter() {
            if *entry.key() == sender || !entry.rooms.contains(&room_id) {
                continue;
            }
            match entry.outbound.send(frame.to_string()) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    warn!(connection = %entry.key(), room_id, "peer channel closed, skipping");
                }
            }
        }
        delivered
    }
}

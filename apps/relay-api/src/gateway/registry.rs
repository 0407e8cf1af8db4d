//! Registry of live connections and their display names.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::connection::{ConnectionHandle, ConnectionId};

/// One registered connection, as returned by [`Registry::snapshot`].
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub connection: ConnectionHandle,
    pub display_name: String,
}

/// The authoritative "who is online" set.
///
/// Uses `DashMap` keyed by connection id, so registration, removal and
/// snapshots from many connection tasks only contend per shard. Nothing is
/// ever sent while a shard lock is held: broadcasters take a [`snapshot`]
/// first and deliver against that copy.
///
/// [`snapshot`]: Registry::snapshot
pub struct Registry {
    entries: DashMap<ConnectionId, RegistryEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Add a connection. It becomes a broadcast target immediately.
    ///
    /// A connection is registered once per lifetime; a second registration
    /// for the same id is ignored and the first name is kept.
    pub fn register(&self, connection: ConnectionHandle, display_name: impl Into<String>) {
        let id = connection.id();
        match self.entries.entry(id) {
            Entry::Occupied(_) => {
                tracing::warn!(connection_id = %id, "connection registered twice; ignoring");
            }
            Entry::Vacant(slot) => {
                slot.insert(RegistryEntry {
                    connection,
                    display_name: display_name.into(),
                });
            }
        }
    }

    /// Remove a connection. Returns whether an entry was actually removed.
    pub fn unregister(&self, id: ConnectionId) -> bool {
        self.take(id).is_some()
    }

    /// Remove a connection and hand back its display name, or `None` if some
    /// other caller already removed it.
    pub fn take(&self, id: ConnectionId) -> Option<String> {
        self.entries
            .remove(&id)
            .map(|(_, entry)| entry.display_name)
    }

    /// Point-in-time copy of every entry, in registration order.
    pub fn snapshot(&self) -> Vec<RegistryEntry> {
        let mut entries: Vec<RegistryEntry> =
            self.entries.iter().map(|e| e.value().clone()).collect();
        entries.sort_unstable_by_key(|e| e.connection.id());
        entries
    }

    /// Display names of every live connection, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.snapshot()
            .into_iter()
            .map(|e| e.display_name)
            .collect()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

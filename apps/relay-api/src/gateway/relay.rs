//! Broadcast relay: fans every message out to all registered connections.

use std::collections::VecDeque;
use std::sync::Arc;

use axum::extract::ws::Utf8Bytes;
use relay_common::ChatMessage;

use super::connection::{ConnectionHandle, ConnectionId};
use super::registry::Registry;

/// Delivers messages to every connection in the [`Registry`], the sender
/// included.
///
/// Delivery is best effort. A recipient whose queue is closed is treated as
/// disconnected: it is unregistered on the spot and its departure notice
/// joins the same broadcast round, so the remaining recipients are always
/// served and no error escapes a broadcast call.
pub struct Relay {
    registry: Arc<Registry>,
    announce_joins: bool,
}

impl Relay {
    pub fn new(registry: Arc<Registry>, announce_joins: bool) -> Self {
        Self {
            registry,
            announce_joins,
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Register a freshly upgraded connection, announcing it if configured.
    pub fn join(&self, connection: ConnectionHandle, display_name: &str) {
        self.registry.register(connection, display_name);
        if self.announce_joins {
            self.broadcast(ChatMessage::joined(display_name));
        }
    }

    /// Unregister a closed connection. The departure notice goes out only if
    /// this call did the removal, so it is sent exactly once per connection.
    pub fn depart(&self, id: ConnectionId) -> bool {
        match self.registry.take(id) {
            Some(display_name) => {
                self.broadcast(ChatMessage::departed(&display_name));
                true
            }
            None => false,
        }
    }

    /// Decode one inbound frame from `display_name` and broadcast it.
    pub fn relay(&self, display_name: &str, frame: &str) -> usize {
        match ChatMessage::decode(frame, display_name) {
            ChatMessage::File {
                mime_type,
                encoded_content,
            } => self.broadcast_file(mime_type, encoded_content),
            ChatMessage::Text { sender, body } => self.broadcast_text(sender, body),
            ChatMessage::Notice { text } => self.broadcast_notice(text),
        }
    }

    pub fn broadcast_text(&self, sender: impl Into<String>, body: impl Into<String>) -> usize {
        self.broadcast(ChatMessage::text(sender, body))
    }

    /// The content is opaque and forwarded untouched.
    pub fn broadcast_file(
        &self,
        mime_type: impl Into<String>,
        encoded_content: impl Into<String>,
    ) -> usize {
        self.broadcast(ChatMessage::file(mime_type, encoded_content))
    }

    pub fn broadcast_notice(&self, text: impl Into<String>) -> usize {
        self.broadcast(ChatMessage::notice(text))
    }

    /// Send `message` to every registered connection. Returns how many
    /// recipients accepted it.
    pub fn broadcast(&self, message: ChatMessage) -> usize {
        let delivered = self.deliver(&message);
        tracing::debug!(recipients = delivered, "message relayed");
        delivered
    }

    fn deliver(&self, message: &ChatMessage) -> usize {
        let mut departures = VecDeque::new();
        let delivered = self.deliver_once(message, &mut departures);

        // Notices for recipients found closed along the way. Every queued
        // notice removed one entry, so the registry shrinks until this ends.
        while let Some(notice) = departures.pop_front() {
            self.deliver_once(&notice, &mut departures);
        }

        delivered
    }

    fn deliver_once(&self, message: &ChatMessage, departures: &mut VecDeque<ChatMessage>) -> usize {
        let frame = Utf8Bytes::from(message.render());
        let mut delivered = 0;

        for entry in self.registry.snapshot() {
            if entry.connection.send(frame.clone()) {
                delivered += 1;
                continue;
            }

            let id = entry.connection.id();
            tracing::debug!(connection_id = %id, "send failed; dropping connection");
            if let Some(display_name) = self.registry.take(id) {
                departures.push_back(ChatMessage::departed(&display_name));
            }
        }

        delivered
    }
}

//! WebSocket relay: connection handles, the live-connection registry, the
//! broadcast relay, and the per-connection event loop.

pub mod connection;
pub mod registry;
pub mod relay;
pub mod server;

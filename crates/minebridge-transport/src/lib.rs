//! Transport abstraction layer for MineBridge.
//!
//! Provides the [`Dialer`] and [`Connection`] traits the connection manager
//! is generic over, plus the production implementation: a `wss://` client
//! that trusts only the relay's pinned certificate ([`TlsTrust`]).
//!
//! The traits spell out `impl Future<...> + Send` instead of `async fn` so
//! the connection manager can move connections into spawned Tokio tasks.
//! Implementations can still use plain `async fn`.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`

use std::fmt;
use std::future::Future;

mod error;
mod tls;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
pub use tls::{CERT_EXTENSION, TlsTrust};
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketDialer};

/// Opaque identifier for a connection, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Opens outbound connections to one fixed endpoint.
pub trait Dialer: Send + Sync + 'static {
    /// The connection type produced by this dialer.
    type Connection: Connection;
    /// The error type for dial attempts.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Performs one connection attempt, including any TLS and WebSocket
    /// handshakes.
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send;

    /// Human-readable endpoint for logs (`wss://host:port`).
    fn endpoint(&self) -> &str;
}

/// A single connection that carries text frames in both directions.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends one text frame to the remote peer.
    fn send(&self, frame: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Receives the next text frame from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    fn recv(&self) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

    /// Closes the connection.
    fn close(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_new_and_into_inner() {
        let id = ConnectionId::new(42);
        assert_eq!(id.into_inner(), 42);
    }

    #[test]
    fn test_connection_id_display() {
        assert_eq!(ConnectionId::new(7).to_string(), "conn-7");
    }
}

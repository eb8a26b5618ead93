//! Error types for the session layer.

use crate::ConnectionState;

/// Errors raised by the connection state machine and its settings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    /// The requested state change is not an edge of the state machine.
    #[error("invalid connection state transition: {from} -> {to}")]
    InvalidTransition {
        from: ConnectionState,
        to: ConnectionState,
    },

    /// The relay password is empty.
    #[error("relay password must not be empty")]
    EmptyPassword,

    /// No logical server names were given.
    #[error("at least one server name is required")]
    NoServers,

    /// A logical server name is blank or collides with the `all` sentinel.
    #[error("invalid server name `{0}`")]
    InvalidServerName(String),

    /// The reconnect policy is inconsistent.
    #[error("invalid reconnect policy: {0}")]
    InvalidPolicy(String),
}

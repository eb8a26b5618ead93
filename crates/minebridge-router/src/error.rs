//! Error types for the router layer.

use minebridge_protocol::ProtocolError;

/// Errors raised while registering action modules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
    /// A binding was declared with an empty action tag.
    #[error("module {module} declares a binding with an empty action tag")]
    EmptyActionTag { module: &'static str },

    /// A module declared no bindings at all.
    #[error("module {module} declares no bindings")]
    NoBindings { module: &'static str },
}

/// Why a handler could not complete.
///
/// Handlers return this; the router logs it and turns it into
/// [`DispatchOutcome::HandlerFailed`](crate::DispatchOutcome::HandlerFailed).
/// It never reaches the connection.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The payload decoded but its content is unusable (bad uuid, ...).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A reply could not be queued.
    #[error(transparent)]
    Outbound(#[from] OutboundError),

    /// The game platform refused or failed the operation.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Why an outbound frame was not queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OutboundError {
    /// No open session to write to.
    #[error("not connected to the relay")]
    NotConnected,

    /// The connection manager has shut down for good.
    #[error("connection manager is closed")]
    Closed,
}

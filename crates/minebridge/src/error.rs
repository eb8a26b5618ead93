//! Unified error type for MineBridge.

use minebridge_command::GrammarError;
use minebridge_protocol::ProtocolError;
use minebridge_router::{HandlerError, OutboundError, RouterError};
use minebridge_session::SessionError;
use minebridge_transport::TransportError;

use crate::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `minebridge` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum MineBridgeError {
    /// A transport-level error (certificate, dial, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (state transition, credentials, policy).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A module could not be registered.
    #[error(transparent)]
    Router(#[from] RouterError),

    /// An envelope could not be encoded or queued.
    #[error(transparent)]
    Handler(#[from] HandlerError),

    /// A raw frame could not be queued.
    #[error(transparent)]
    Outbound(#[from] OutboundError),

    /// The command grammar tables are inconsistent.
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    /// The configuration file is missing, malformed or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

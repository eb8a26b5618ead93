//! Wire protocol for MineBridge.
//!
//! This crate defines the "language" game servers and the relay speak:
//!
//! - **Envelope** ([`Envelope`], [`ServerTarget`]): the frame shape
//!   shared by every action.
//! - **Actions** ([`actions`]): action tags and their typed bodies.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): converts values to and
//!   from text frames.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! The protocol layer sits between the transport (raw text frames) and
//! the router (handlers). It doesn't know about sockets or handlers; it
//! only knows how frames look.
//!
//! ```text
//! Transport (text) → Protocol (Envelope<T>) → Router (handler)
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

pub mod actions;
mod codec;
mod envelope;
mod error;
mod message_type;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use actions::{
    Authenticate, Categorized, CommandExecuted, DispatchCommand, PlayerKey, PlayerRef,
    PlayerServerCheck, PlayerStatusCheck, SendGlobalMessage, SendPlayerMessage,
    SendServerMessage,
};
pub use codec::{Codec, JsonCodec};
pub use envelope::{ALL_SERVERS, Envelope, Fields, ServerTarget};
pub use error::ProtocolError;
pub use message_type::{MessageType, UnknownMessageType};

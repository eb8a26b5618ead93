//! Error types for the protocol layer.
//!
//! Each MineBridge crate defines its own error enum. A `ProtocolError`
//! always means the problem is in the shape of a frame, never in the
//! network or in a handler.

/// Errors that can occur while encoding or decoding envelopes.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into a text frame).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, a missing required field,
    /// or a field of the wrong type.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame is well-formed but violates a protocol rule, e.g. a
    /// `uuid` field that isn't a UUID.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

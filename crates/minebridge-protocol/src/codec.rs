//! Codec trait and the JSON implementation used on the relay socket.
//!
//! The relay speaks JSON text frames, so unlike a byte-oriented codec the
//! [`Codec`] trait here works on `String`/`&str` directly. Handlers and the
//! connection manager never touch `serde_json` themselves; they go through
//! a codec value.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Converts values to and from text frames.
///
/// `Send + Sync + 'static`: a codec is held by the router and by every
/// responder clone, and those move between Tokio tasks.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into one text frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if the value can't be represented.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes one text frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the frame is malformed or doesn't
    /// match `T`.
    fn decode<T: DeserializeOwned>(&self, frame: &str) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// ```rust
/// use minebridge_protocol::{Codec, Envelope, JsonCodec};
///
/// let codec = JsonCodec;
/// let frame = codec.encode(&Envelope::new("ping")).unwrap();
/// assert_eq!(frame, r#"{"action":"ping"}"#);
///
/// let back: Envelope = codec.decode(&frame).unwrap();
/// assert_eq!(back.action, "ping");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, frame: &str) -> Result<T, ProtocolError> {
        serde_json::from_str(frame).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Envelope, SendGlobalMessage, actions};

    #[test]
    fn test_encode_typed_envelope_is_flat() {
        let env = Envelope::with_body(
            actions::SEND_GLOBAL_MESSAGE,
            SendGlobalMessage {
                message_type: "info".into(),
                message: "hello".into(),
            },
        );
        let frame = JsonCodec.encode(&env).unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "action": "send-global-message",
                "message_type": "info",
                "message": "hello",
            })
        );
    }

    #[test]
    fn test_decode_malformed_frame() {
        let err = JsonCodec.decode::<Envelope>("{not json").unwrap_err();
        assert!(matches!(err, ProtocolError::Decode(_)));
    }

    #[test]
    fn test_decode_wrong_payload_shape() {
        let err = JsonCodec
            .decode::<Envelope<SendGlobalMessage>>(r#"{"action":"send-global-message"}"#)
            .unwrap_err();
        assert!(matches!(err, ProtocolError::Decode(_)));
    }
}

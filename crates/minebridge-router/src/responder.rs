//! The back-reference handlers use to reply to the relay.

use std::fmt;
use std::sync::Arc;

use minebridge_protocol::{Codec, Envelope, JsonCodec};
use serde::Serialize;

use crate::{HandlerError, OutboundError};

/// Sink for outbound text frames, implemented by the connection manager.
///
/// `send_frame` only queues; it never blocks on the network.
pub trait Outbound: Send + Sync + 'static {
    fn send_frame(&self, frame: String) -> Result<(), OutboundError>;
}

/// A cloneable handle for sending envelopes to the relay.
///
/// Every registered module receives one in
/// [`ActionModule::attach`](crate::ActionModule::attach).
#[derive(Clone)]
pub struct Responder {
    outbound: Arc<dyn Outbound>,
    codec: JsonCodec,
}

impl Responder {
    pub fn new(outbound: Arc<dyn Outbound>) -> Self {
        Self {
            outbound,
            codec: JsonCodec,
        }
    }

    /// A responder with nowhere to send: every call fails with
    /// [`OutboundError::NotConnected`].
    pub fn detached() -> Self {
        Self::new(Arc::new(Detached))
    }

    /// Encodes and queues one envelope.
    ///
    /// # Errors
    /// [`HandlerError::Protocol`] if encoding fails, or
    /// [`HandlerError::Outbound`] if the frame can't be queued.
    pub fn send<T: Serialize>(&self, envelope: &Envelope<T>) -> Result<(), HandlerError> {
        let frame = self.codec.encode(envelope)?;
        self.outbound.send_frame(frame)?;
        tracing::trace!(action = %envelope.action, "queued outbound envelope");
        Ok(())
    }

    /// Queues an already-encoded frame.
    pub fn send_frame(&self, frame: String) -> Result<(), OutboundError> {
        self.outbound.send_frame(frame)
    }
}

impl fmt::Debug for Responder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Responder").finish_non_exhaustive()
    }
}

struct Detached;

impl Outbound for Detached {
    fn send_frame(&self, _frame: String) -> Result<(), OutboundError> {
        Err(OutboundError::NotConnected)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Capture(Mutex<Vec<String>>);

    impl Outbound for Capture {
        fn send_frame(&self, frame: String) -> Result<(), OutboundError> {
            self.0.lock().unwrap().push(frame);
            Ok(())
        }
    }

    #[test]
    fn test_send_encodes_envelope() {
        let capture = Arc::new(Capture::default());
        let responder = Responder::new(capture.clone());

        responder
            .send(&Envelope::new("player-status-check").server("lobby"))
            .unwrap();

        let frames = capture.0.lock().unwrap();
        assert_eq!(
            frames.as_slice(),
            [r#"{"action":"player-status-check","server":"lobby"}"#]
        );
    }

    #[test]
    fn test_detached_rejects() {
        let err = Responder::detached().send(&Envelope::new("x")).unwrap_err();
        assert!(matches!(
            err,
            HandlerError::Outbound(OutboundError::NotConnected)
        ));
    }
}

//! Per-connection session loop: authenticate, then multiplex.
//!
//! Each established connection gets its own Tokio task running this loop.
//! The flow is:
//!   1. Send the `authenticate` frame (state `Authenticating`)
//!   2. Mark the session `Open`
//!   3. Loop: shutdown signal, queued outbound frames, inbound frames
//!
//! Inbound frames are dispatched synchronously on this task; handler
//! replies land in the outbound queue and go out on the next iteration.

use std::fmt;

use minebridge_protocol::{Codec, JsonCodec};
use minebridge_session::ConnectionState;
use minebridge_transport::{Connection, Dialer};
use tokio::sync::watch;

use crate::client::Shared;

/// Why a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CloseReason {
    /// Shutdown was requested; do not reconnect.
    Intentional,
    /// The relay closed the connection.
    Remote,
    /// Network or protocol failure.
    Error(String),
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intentional => f.write_str("closed on request"),
            Self::Remote => f.write_str("closed by relay"),
            Self::Error(e) => write!(f, "connection error: {e}"),
        }
    }
}

/// Resolves once the shutdown flag is `true` (or its sender is gone).
///
/// Cancel safe; meant to be recreated in every `select!` iteration.
pub(crate) async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}

/// Runs one connection from authentication to close.
pub(crate) async fn run_session<D: Dialer>(shared: &Shared<D>, conn: D::Connection) -> CloseReason {
    let conn_id = conn.id();
    let mut shutdown = shared.shutdown.subscribe();
    tracing::debug!(%conn_id, endpoint = shared.dialer.endpoint(), "session started");

    let reason = match authenticate(shared, &conn).await {
        Ok(()) => {
            shared.link.transition(ConnectionState::Open);
            tracing::info!(
                %conn_id,
                servers = ?shared.credentials.server_list(),
                "authenticated with relay"
            );
            serve(shared, &conn, &mut shutdown).await
        }
        Err(reason) => reason,
    };

    if reason == CloseReason::Intentional {
        if let Err(e) = conn.close().await {
            tracing::debug!(%conn_id, error = %e, "close handshake failed");
        }
    }
    tracing::debug!(%conn_id, %reason, "session ended");
    reason
}

async fn authenticate<D: Dialer>(
    shared: &Shared<D>,
    conn: &D::Connection,
) -> Result<(), CloseReason> {
    let frame = JsonCodec
        .encode(&shared.credentials.authenticate_envelope())
        .map_err(|e| CloseReason::Error(e.to_string()))?;
    conn.send(&frame)
        .await
        .map_err(|e| CloseReason::Error(e.to_string()))
}

async fn serve<D: Dialer>(
    shared: &Shared<D>,
    conn: &D::Connection,
    shutdown: &mut watch::Receiver<bool>,
) -> CloseReason {
    let mut outbound = shared.outbound.lock().await;

    let reason = loop {
        tokio::select! {
            biased;

            () = shutdown_requested(shutdown) => break CloseReason::Intentional,

            frame = outbound.recv() => match frame {
                Some(frame) => {
                    if let Err(e) = conn.send(&frame).await {
                        break CloseReason::Error(e.to_string());
                    }
                }
                // The link owns a sender for as long as `shared` lives.
                None => break CloseReason::Intentional,
            },

            inbound = conn.recv() => match inbound {
                Ok(Some(frame)) => {
                    shared.router.dispatch(&frame);
                }
                Ok(None) => break CloseReason::Remote,
                Err(e) => break CloseReason::Error(e.to_string()),
            },
        }
    };

    // Undelivered frames are not carried over to the next connection.
    let mut dropped = 0_usize;
    while outbound.try_recv().is_ok() {
        dropped += 1;
    }
    if dropped > 0 {
        tracing::debug!(dropped, "discarded queued outbound frames");
    }
    reason
}

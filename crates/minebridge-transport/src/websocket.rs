//! Secure WebSocket dialer and connection using `tokio-tungstenite`.

use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{Connector, MaybeTlsStream, WebSocketStream};

use crate::{Connection, ConnectionId, Dialer, TlsTrust, TransportError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> ConnectionId {
    ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
}

fn io_error(
    kind: std::io::ErrorKind,
    e: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> std::io::Error {
    std::io::Error::new(kind, e)
}

// ---------------------------------------------------------------------------
// Dialer
// ---------------------------------------------------------------------------

/// Dials `wss://host:port`, trusting only the pinned relay certificate.
#[derive(Debug, Clone)]
pub struct WebSocketDialer {
    url: String,
    trust: TlsTrust,
}

impl WebSocketDialer {
    pub fn new(host: &str, port: u16, trust: TlsTrust) -> Self {
        Self {
            url: format!("wss://{host}:{port}"),
            trust,
        }
    }

    /// Loads `<certs_dir>/<host>.crt` and builds a dialer for it.
    ///
    /// # Errors
    /// Any certificate error from [`TlsTrust::load`].
    pub fn with_trust_dir(
        host: &str,
        port: u16,
        certs_dir: &std::path::Path,
    ) -> Result<Self, TransportError> {
        let trust = TlsTrust::load(certs_dir, host)?;
        Ok(Self::new(host, port, trust))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

type TlsStream = MaybeTlsStream<tokio::net::TcpStream>;

impl Dialer for WebSocketDialer {
    type Connection = WebSocketConnection<TlsStream>;
    type Error = TransportError;

    async fn connect(&self) -> Result<Self::Connection, Self::Error> {
        let connector = Connector::Rustls(self.trust.client_config());
        let (ws, _response) = tokio_tungstenite::connect_async_tls_with_config(
            self.url.as_str(),
            None,
            false,
            Some(connector),
        )
        .await
        .map_err(|e| {
            TransportError::ConnectFailed(io_error(std::io::ErrorKind::ConnectionRefused, e))
        })?;

        let conn = WebSocketConnection::new(ws);
        tracing::debug!(id = %conn.id(), url = %self.url, "websocket connected");
        Ok(conn)
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// A single WebSocket connection carrying text frames.
///
/// Generic over the underlying byte stream so tests can run it over an
/// in-memory duplex pipe. The stream is split so a pending `recv` never
/// blocks a `send`.
pub struct WebSocketConnection<S> {
    id: ConnectionId,
    sink: Mutex<SplitSink<WebSocketStream<S>, Message>>,
    stream: Mutex<SplitStream<WebSocketStream<S>>>,
}

impl<S> WebSocketConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps an established WebSocket stream.
    pub fn new(ws: WebSocketStream<S>) -> Self {
        let (sink, stream) = ws.split();
        Self {
            id: next_id(),
            sink: Mutex::new(sink),
            stream: Mutex::new(stream),
        }
    }
}

impl<S> Connection for WebSocketConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    type Error = TransportError;

    async fn send(&self, frame: &str) -> Result<(), Self::Error> {
        self.sink
            .lock()
            .await
            .send(Message::text(frame.to_owned()))
            .await
            .map_err(|e| TransportError::SendFailed(io_error(std::io::ErrorKind::BrokenPipe, e)))
    }

    async fn recv(&self) -> Result<Option<String>, Self::Error> {
        let mut stream = self.stream.lock().await;
        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text.as_str().to_owned())),
                Some(Ok(Message::Binary(data))) => match String::from_utf8(data.to_vec()) {
                    Ok(text) => return Ok(Some(text)),
                    Err(_) => {
                        tracing::warn!(id = %self.id, len = data.len(), "dropping non-utf8 binary frame");
                        continue;
                    }
                },
                Some(Ok(Message::Close(frame))) => {
                    tracing::debug!(id = %self.id, ?frame, "close frame received");
                    return Ok(None);
                }
                None => return Ok(None),
                Some(Ok(_)) => continue, // ping/pong/raw frame
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(io_error(
                        std::io::ErrorKind::ConnectionReset,
                        e,
                    )));
                }
            }
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.sink
            .lock()
            .await
            .close()
            .await
            .map_err(|e| TransportError::SendFailed(io_error(std::io::ErrorKind::BrokenPipe, e)))
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}

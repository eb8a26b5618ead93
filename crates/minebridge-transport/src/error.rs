use std::path::PathBuf;

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The pinned relay certificate file does not exist.
    #[error("certificate not found: {}", path.display())]
    CertificateMissing { path: PathBuf },

    /// The certificate file exists but holds no usable certificate.
    #[error("invalid certificate {}: {reason}", path.display())]
    InvalidCertificate { path: PathBuf, reason: String },

    /// Reading the certificate file or creating its directory failed.
    #[error("certificate store i/o failed at {}: {source}", path.display())]
    CertificateIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Building the TLS client configuration failed.
    #[error("tls setup failed: {0}")]
    Tls(#[from] rustls::Error),

    /// The TCP/TLS/WebSocket handshake failed.
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] std::io::Error),

    /// Sending a frame failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving a frame failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),
}

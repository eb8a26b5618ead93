//! Trust store for the relay's self-signed certificate.
//!
//! The relay presents one self-signed certificate. Instead of the public
//! web PKI, the client trusts exactly that certificate, read from
//! `<certs_dir>/<host>.crt`. There is no plaintext fallback: if the file is
//! missing or unreadable, no dialer can be built.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustls::ClientConfig;
use rustls::RootCertStore;
use rustls::pki_types::CertificateDer;

use crate::TransportError;

/// File extension of pinned certificates.
pub const CERT_EXTENSION: &str = "crt";

/// A TLS client configuration that trusts only the pinned certificate(s).
#[derive(Clone)]
pub struct TlsTrust {
    path: PathBuf,
    config: Arc<ClientConfig>,
}

impl TlsTrust {
    /// Location of the certificate for `host` inside `certs_dir`.
    pub fn cert_path(certs_dir: &Path, host: &str) -> PathBuf {
        certs_dir.join(format!("{host}.{CERT_EXTENSION}"))
    }

    /// Loads `<certs_dir>/<host>.crt`, creating `certs_dir` if it doesn't
    /// exist yet (so operators know where to drop the file).
    ///
    /// # Errors
    /// - [`TransportError::CertificateMissing`] if the file is absent
    /// - [`TransportError::InvalidCertificate`] if it holds no valid
    ///   certificate
    /// - [`TransportError::CertificateIo`] on filesystem errors
    pub fn load(certs_dir: &Path, host: &str) -> Result<Self, TransportError> {
        if !certs_dir.exists() {
            std::fs::create_dir_all(certs_dir).map_err(|source| {
                TransportError::CertificateIo {
                    path: certs_dir.to_path_buf(),
                    source,
                }
            })?;
            tracing::info!(dir = %certs_dir.display(), "created certificate directory");
        }

        let path = Self::cert_path(certs_dir, host);
        if !path.is_file() {
            tracing::error!(path = %path.display(), "relay certificate not found");
            return Err(TransportError::CertificateMissing { path });
        }

        let bytes = std::fs::read(&path).map_err(|source| TransportError::CertificateIo {
            path: path.clone(),
            source,
        })?;

        Self::from_bytes(path, &bytes)
    }

    /// Builds the trust store from certificate bytes (PEM or raw DER).
    ///
    /// `path` is only used in error messages and logs.
    pub fn from_bytes(path: PathBuf, bytes: &[u8]) -> Result<Self, TransportError> {
        let invalid = |reason: String| TransportError::InvalidCertificate {
            path: path.clone(),
            reason,
        };

        let mut certs = rustls_pemfile::certs(&mut Cursor::new(bytes))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| invalid(e.to_string()))?;
        if certs.is_empty() {
            // No PEM blocks: treat the whole file as one DER certificate.
            certs.push(CertificateDer::from(bytes.to_vec()));
        }

        let mut roots = RootCertStore::empty();
        for cert in certs {
            roots.add(cert).map_err(|e| invalid(e.to_string()))?;
        }

        let config = ClientConfig::builder_with_provider(Arc::new(
            rustls::crypto::ring::default_provider(),
        ))
        .with_safe_default_protocol_versions()?
        .with_root_certificates(roots)
        .with_no_client_auth();

        tracing::debug!(path = %path.display(), "loaded pinned relay certificate");

        Ok(Self {
            path,
            config: Arc::new(config),
        })
    }

    /// Where the certificate was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The rustls configuration to hand to the WebSocket connector.
    pub fn client_config(&self) -> Arc<ClientConfig> {
        Arc::clone(&self.config)
    }
}

impl std::fmt::Debug for TlsTrust {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsTrust")
            .field("path", &self.path)
            .finish()
    }
}

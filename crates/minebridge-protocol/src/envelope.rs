//! The wire unit: one JSON object per text frame.
//!
//! ```text
//! { "action": "send-server-message", "server": "lobby", "message_type": "info", "message": "hi" }
//!   └───────── routing ─────────┘  └─────────── origin/target ──┘  └──────── body (T) ────────┘
//! ```
//!
//! `action` and `server` are common to every frame; everything else is the
//! action-specific body, flattened into the same object.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generic body: whatever fields the frame carries besides `action` and
/// `server`.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Sentinel server name meaning "every server".
pub const ALL_SERVERS: &str = "all";

/// One frame on the relay socket.
///
/// `Envelope` (no type argument) is the generic form used before the
/// action is known. `Envelope<SendPlayerMessage>` etc. are the typed forms
/// handlers receive.
///
/// ## Serde attributes
///
/// - `server` is omitted from the JSON when `None`, and defaults to `None`
///   when absent.
/// - `#[serde(flatten)]` inlines the body's fields next to `action`, which
///   is what the relay expects (no nested `"body": {...}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Fields> {
    /// Logical action name; selects the handler.
    pub action: String,

    /// Origin or target server name, or [`ALL_SERVERS`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(flatten)]
    pub body: T,
}

impl Envelope<Fields> {
    /// An envelope with no body fields.
    pub fn new(action: impl Into<String>) -> Self {
        Self::with_body(action, Fields::new())
    }
}

impl<T> Envelope<T> {
    pub fn with_body(action: impl Into<String>, body: T) -> Self {
        Self {
            action: action.into(),
            server: None,
            body,
        }
    }

    /// Sets the `server` field (builder style).
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Interprets the `server` field.
    pub fn target(&self) -> Option<ServerTarget> {
        self.server.as_deref().map(ServerTarget::from_name)
    }
}

// ---------------------------------------------------------------------------
// ServerTarget
// ---------------------------------------------------------------------------

/// What a `server` field addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServerTarget {
    /// The `all` sentinel (matched case-insensitively).
    All,
    /// One named server.
    Named(String),
}

impl ServerTarget {
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case(ALL_SERVERS) {
            Self::All
        } else {
            Self::Named(name.to_string())
        }
    }

    /// Returns `true` if `server` is addressed by this target.
    pub fn includes(&self, server: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == server,
        }
    }
}

impl fmt::Display for ServerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_SERVERS),
            Self::Named(name) => f.write_str(name),
        }
    }
}

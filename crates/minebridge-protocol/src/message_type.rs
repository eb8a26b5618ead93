//! Message categories carried in `message_type`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a chat message should be presented to players.
///
/// Parsing is case-insensitive (`"WARN"`, `"warn"` and `"Warn"` are all
/// [`MessageType::Warn`]); serialization always emits the lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Info,
    Success,
    Warn,
    Error,
    Question,
    Announce,
    NoPrefix,
}

impl MessageType {
    pub const ALL: [MessageType; 7] = [
        Self::Info,
        Self::Success,
        Self::Warn,
        Self::Error,
        Self::Question,
        Self::Announce,
        Self::NoPrefix,
    ];

    /// Case-insensitive lookup. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name.trim()))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Question => "question",
            Self::Announce => "announce",
            Self::NoPrefix => "no_prefix",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by [`MessageType::from_str`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown message type: {0}")]
pub struct UnknownMessageType(pub String);

impl FromStr for MessageType {
    type Err = UnknownMessageType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownMessageType(s.to_string()))
    }
}

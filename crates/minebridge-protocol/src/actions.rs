//! Action tags and their typed payloads.
//!
//! Each struct is the *body* of an [`Envelope`](crate::Envelope); `action`
//! and `server` live on the envelope itself. Field names match the wire
//! (`message_type`, `server_list`, ...), so no renames are needed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{MessageType, ProtocolError};

// ---------------------------------------------------------------------------
// Action tags
// ---------------------------------------------------------------------------

pub const SEND_PLAYER_MESSAGE: &str = "send-player-message";
pub const SEND_GLOBAL_MESSAGE: &str = "send-global-message";
pub const SEND_SERVER_MESSAGE: &str = "send-server-message";
pub const DISPATCH_COMMAND: &str = "dispatch-command";
pub const COMMAND_EXECUTED: &str = "command-executed";
pub const PLAYER_STATUS_CHECK: &str = "player-status-check";
pub const PLAYER_SERVER_CHECK: &str = "player-server-check";
/// Client → relay only.
pub const AUTHENTICATE: &str = "authenticate";

// ---------------------------------------------------------------------------
// Player references
// ---------------------------------------------------------------------------

/// A player named by `username` and/or `uuid`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

/// The key a player lookup should use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerKey {
    Name(String),
    Uuid(Uuid),
}

impl PlayerRef {
    pub fn by_name(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            uuid: None,
        }
    }

    pub fn by_uuid(uuid: Uuid) -> Self {
        Self {
            username: None,
            uuid: Some(uuid.to_string()),
        }
    }

    /// Picks the lookup key: a non-empty `username` wins, otherwise `uuid`.
    ///
    /// # Errors
    /// [`ProtocolError::InvalidMessage`] if the uuid is chosen but doesn't
    /// parse.
    pub fn key(&self) -> Result<Option<PlayerKey>, ProtocolError> {
        if let Some(name) = self.username.as_deref().filter(|n| !n.is_empty()) {
            return Ok(Some(PlayerKey::Name(name.to_string())));
        }
        match self.uuid.as_deref().filter(|u| !u.is_empty()) {
            Some(raw) => Uuid::parse_str(raw)
                .map(|id| Some(PlayerKey::Uuid(id)))
                .map_err(|e| ProtocolError::InvalidMessage(format!("invalid uuid `{raw}`: {e}"))),
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// `send-player-message`: one player, by name or uuid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendPlayerMessage {
    #[serde(flatten)]
    pub player: PlayerRef,
    pub message_type: String,
    pub message: String,
}

/// `send-global-message`: every online player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendGlobalMessage {
    pub message_type: String,
    pub message: String,
}

/// `send-server-message`: players of the envelope's `server` (or all).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendServerMessage {
    pub message_type: String,
    pub message: String,
}

/// Bodies that carry a `message_type`.
pub trait Categorized {
    fn message_type(&self) -> &str;

    /// The parsed category; `None` for an unknown name.
    fn kind(&self) -> Option<MessageType> {
        MessageType::parse(self.message_type())
    }
}

impl Categorized for SendPlayerMessage {
    fn message_type(&self) -> &str {
        &self.message_type
    }
}

impl Categorized for SendGlobalMessage {
    fn message_type(&self) -> &str {
        &self.message_type
    }
}

impl Categorized for SendServerMessage {
    fn message_type(&self) -> &str {
        &self.message_type
    }
}

/// `dispatch-command`: raw command lines to run on the envelope's target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchCommand {
    pub commands: Vec<String>,
}

/// `command-executed`: a moderation command in structured form.
///
/// `args` is keyed by syntax parameter name (`target`, `duration`, ...).
/// A `BTreeMap` keeps the serialized key order stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandExecuted {
    pub command_type: String,
    pub executor: String,
    #[serde(default)]
    pub args: BTreeMap<String, String>,
}

/// `player-status-check`. Requests carry only the player; responses add
/// `online`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatusCheck {
    #[serde(flatten)]
    pub player: PlayerRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online: Option<bool>,
}

/// `player-server-check`. The response names the hosting server in the
/// envelope's `server` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerServerCheck {
    #[serde(flatten)]
    pub player: PlayerRef,
}

/// `authenticate`: the first frame after every connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authenticate {
    pub password: String,
    pub server_list: Vec<String>,
}

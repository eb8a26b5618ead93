//! The game platform the bridge acts on.
//!
//! The action modules never touch a game engine directly; they go through
//! [`Platform`]. A proxy implements it over its backend servers, a single
//! game server over itself, tests over a `Vec`.

use minebridge_protocol::PlayerKey;
use minebridge_router::HandlerError;
use uuid::Uuid;

/// An online player as the platform sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfo {
    /// Canonical (correctly cased) name.
    pub name: String,
    pub uuid: Uuid,
    /// The server hosting the player, when the platform knows it.
    pub server: Option<String>,
}

impl PlayerInfo {
    pub fn new(name: impl Into<String>, uuid: Uuid) -> Self {
        Self {
            name: name.into(),
            uuid,
            server: None,
        }
    }

    /// Sets the hosting server (builder style).
    pub fn on(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Returns `true` if this player matches `key`. Names compare
    /// case-insensitively.
    pub fn matches(&self, key: &PlayerKey) -> bool {
        match key {
            PlayerKey::Name(name) => self.name.eq_ignore_ascii_case(name),
            PlayerKey::Uuid(uuid) => self.uuid == *uuid,
        }
    }
}

/// Player lookup, chat delivery and command execution.
///
/// Calls come from the session task and must not block for long.
pub trait Platform: Send + Sync + 'static {
    /// Finds an online player.
    fn find_player(&self, key: &PlayerKey) -> Option<PlayerInfo>;

    /// Every online player, across all servers.
    fn online_players(&self) -> Vec<PlayerInfo>;

    /// Players on one server; `None` if the server is unknown.
    fn players_on(&self, server: &str) -> Option<Vec<PlayerInfo>>;

    /// Names of every server this platform can reach.
    fn server_names(&self) -> Vec<String>;

    /// Shows already formatted text to one player.
    fn deliver(&self, player: &PlayerInfo, text: &str);

    /// Runs a command line on `server`, or on the local console for `None`.
    ///
    /// # Errors
    /// [`HandlerError::Platform`] if the server is unknown or refuses the
    /// command.
    fn dispatch_command(&self, server: Option<&str>, line: &str) -> Result<(), HandlerError>;
}

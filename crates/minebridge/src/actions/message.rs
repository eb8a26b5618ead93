//! Chat delivery: `send-player-message`, `send-global-message`,
//! `send-server-message`.

use std::collections::HashMap;
use std::sync::Arc;

use minebridge_protocol::{
    Categorized, Envelope, MessageType, SendGlobalMessage, SendPlayerMessage, SendServerMessage,
    ServerTarget, actions,
};
use minebridge_router::{ActionModule, HandlerError, ModuleBindings};

use crate::{Platform, PlayerInfo};

/// How each [`MessageType`] is presented: a prefix put in front of the text.
///
/// A type with no entry is not supported and its messages are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTable {
    prefixes: HashMap<MessageType, String>,
}

impl MessageTable {
    /// A table that supports no types at all.
    pub fn empty() -> Self {
        Self {
            prefixes: HashMap::new(),
        }
    }

    /// Sets the prefix for `kind` (builder style).
    pub fn with(mut self, kind: MessageType, prefix: impl Into<String>) -> Self {
        self.prefixes.insert(kind, prefix.into());
        self
    }

    pub fn supports(&self, kind: MessageType) -> bool {
        self.prefixes.contains_key(&kind)
    }

    /// Renders `message` for `kind`, or `None` if the type isn't supported.
    pub fn format(&self, kind: MessageType, message: &str) -> Option<String> {
        self.prefixes
            .get(&kind)
            .map(|prefix| format!("{prefix}{message}"))
    }
}

impl Default for MessageTable {
    fn default() -> Self {
        Self::empty()
            .with(MessageType::Info, "[Info] ")
            .with(MessageType::Success, "[Success] ")
            .with(MessageType::Warn, "[Warn] ")
            .with(MessageType::Error, "[Error] ")
            .with(MessageType::Question, "[?] ")
            .with(MessageType::Announce, "[Announcement] ")
            .with(MessageType::NoPrefix, "")
    }
}

// ---------------------------------------------------------------------------
// MessageActions
// ---------------------------------------------------------------------------

/// Delivers relay chat messages to players.
pub struct MessageActions<P> {
    platform: Arc<P>,
    table: MessageTable,
}

impl<P: Platform> MessageActions<P> {
    pub fn new(platform: Arc<P>) -> Self {
        Self::with_table(platform, MessageTable::default())
    }

    pub fn with_table(platform: Arc<P>, table: MessageTable) -> Self {
        Self { platform, table }
    }

    fn player(&self, env: Envelope<SendPlayerMessage>) -> Result<(), HandlerError> {
        let Some(key) = env.body.player.key()? else {
            tracing::debug!("player message names no player");
            return Ok(());
        };
        let Some(text) = self.render(&env.body, &env.body.message) else {
            return Ok(());
        };

        match self.platform.find_player(&key) {
            Some(player) => self.platform.deliver(&player, &text),
            None => tracing::debug!(player = ?key, "player message target is offline"),
        }
        Ok(())
    }

    fn global(&self, env: Envelope<SendGlobalMessage>) -> Result<(), HandlerError> {
        if let Some(text) = self.render(&env.body, &env.body.message) {
            self.broadcast(&self.platform.online_players(), &text);
        }
        Ok(())
    }

    fn server(&self, env: Envelope<SendServerMessage>) -> Result<(), HandlerError> {
        let Some(target) = env.target() else {
            tracing::debug!("server message without server");
            return Ok(());
        };
        let Some(text) = self.render(&env.body, &env.body.message) else {
            return Ok(());
        };

        let players = match &target {
            ServerTarget::All => self.platform.online_players(),
            ServerTarget::Named(name) => match self.platform.players_on(name) {
                Some(players) => players,
                None => {
                    tracing::debug!(server = %name, "server message for unknown server");
                    return Ok(());
                }
            },
        };
        self.broadcast(&players, &text);
        Ok(())
    }

    /// Applies the message table; `None` (and a debug line) for unknown or
    /// unsupported types.
    fn render(&self, body: &impl Categorized, message: &str) -> Option<String> {
        let Some(kind) = body.kind() else {
            tracing::debug!(message_type = body.message_type(), "unknown message type");
            return None;
        };
        let text = self.table.format(kind, message);
        if text.is_none() {
            tracing::debug!(%kind, "message type not supported by this platform");
        }
        text
    }

    fn broadcast(&self, players: &[PlayerInfo], text: &str) {
        for player in players {
            self.platform.deliver(player, text);
        }
    }
}

impl<P: Platform> ActionModule for MessageActions<P> {
    fn bindings(b: &mut ModuleBindings<Self>) {
        b.on(actions::SEND_PLAYER_MESSAGE, Self::player)
            .on(actions::SEND_GLOBAL_MESSAGE, Self::global)
            .on(actions::SEND_SERVER_MESSAGE, Self::server);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_covers_every_type() {
        let table = MessageTable::default();
        for kind in MessageType::ALL {
            assert!(table.supports(kind), "{kind} has no prefix");
        }
        assert_eq!(
            table.format(MessageType::Warn, "low tps").as_deref(),
            Some("[Warn] low tps")
        );
        assert_eq!(
            table.format(MessageType::NoPrefix, "raw").as_deref(),
            Some("raw")
        );
    }

    #[test]
    fn test_custom_table_drops_unsupported_types() {
        let table = MessageTable::empty().with(MessageType::Info, "> ");
        assert_eq!(table.format(MessageType::Info, "hi").as_deref(), Some("> hi"));
        assert_eq!(table.format(MessageType::Error, "hi"), None);
    }
}

//! Player queries: `player-status-check`, `player-server-check`.
//!
//! Replies are built by pure functions from the request and the lookup
//! result, then sent through the attached [`Responder`].

use std::sync::Arc;

use minebridge_protocol::{Envelope, PlayerRef, PlayerServerCheck, PlayerStatusCheck, actions};
use minebridge_router::{ActionModule, HandlerError, ModuleBindings, Responder};

use crate::{Platform, PlayerInfo};

/// Answers relay questions about players.
pub struct PlayerActions<P> {
    platform: Arc<P>,
    responder: Responder,
}

impl<P: Platform> PlayerActions<P> {
    pub fn new(platform: Arc<P>) -> Self {
        Self {
            platform,
            responder: Responder::detached(),
        }
    }

    fn status(&self, env: Envelope<PlayerStatusCheck>) -> Result<(), HandlerError> {
        let found = self.lookup(&env.body.player)?;
        self.responder
            .send(&status_response(&env.body.player, found.as_ref()))
    }

    fn server(&self, env: Envelope<PlayerServerCheck>) -> Result<(), HandlerError> {
        let found = self.lookup(&env.body.player)?;
        self.responder
            .send(&server_response(&env.body.player, found.as_ref()))
    }

    fn lookup(&self, player: &PlayerRef) -> Result<Option<PlayerInfo>, HandlerError> {
        Ok(player.key()?.and_then(|key| self.platform.find_player(&key)))
    }
}

impl<P: Platform> ActionModule for PlayerActions<P> {
    fn attach(&mut self, responder: Responder) {
        self.responder = responder;
    }

    fn bindings(b: &mut ModuleBindings<Self>) {
        b.on(actions::PLAYER_STATUS_CHECK, Self::status)
            .on(actions::PLAYER_SERVER_CHECK, Self::server);
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// The found player's canonical identity, else the request's values.
fn identity(request: &PlayerRef, found: Option<&PlayerInfo>) -> PlayerRef {
    match found {
        Some(player) => PlayerRef {
            username: Some(player.name.clone()),
            uuid: Some(player.uuid.to_string()),
        },
        None => request.clone(),
    }
}

/// Reply to `player-status-check`: `online` is whether the lookup found
/// the player.
pub fn status_response(
    request: &PlayerRef,
    found: Option<&PlayerInfo>,
) -> Envelope<PlayerStatusCheck> {
    Envelope::with_body(
        actions::PLAYER_STATUS_CHECK,
        PlayerStatusCheck {
            player: identity(request, found),
            online: Some(found.is_some()),
        },
    )
}

/// Reply to `player-server-check`: the hosting server goes in the
/// envelope's `server` field, omitted when unknown.
pub fn server_response(
    request: &PlayerRef,
    found: Option<&PlayerInfo>,
) -> Envelope<PlayerServerCheck> {
    let envelope = Envelope::with_body(
        actions::PLAYER_SERVER_CHECK,
        PlayerServerCheck {
            player: identity(request, found),
        },
    );
    match found.and_then(|p| p.server.as_deref()) {
        Some(server) => envelope.server(server),
        None => envelope,
    }
}

//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use minebridge::{Platform, PlayerInfo};
use minebridge_command::CommandGrammar;
use minebridge_protocol::PlayerKey;
use minebridge_router::HandlerError;
use minebridge_transport::{Connection, ConnectionId, Dialer};
use tokio::sync::mpsc;
use tokio::time::Instant;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// An in-memory network: a fixed player list spread over named servers.
#[derive(Default)]
pub struct MockPlatform {
    pub players: Vec<PlayerInfo>,
    pub servers: Vec<String>,
    /// `(player name, rendered text)` in delivery order.
    pub delivered: Mutex<Vec<(String, String)>>,
    /// `(server, command line)` in dispatch order.
    pub commands: Mutex<Vec<(Option<String>, String)>>,
}

impl MockPlatform {
    /// Steve and Alex on `lobby`, Notch on `survival`.
    pub fn network() -> Self {
        Self {
            players: vec![
                PlayerInfo::new("Steve", steve_uuid()).on("lobby"),
                PlayerInfo::new("Alex", Uuid::from_u128(2)).on("lobby"),
                PlayerInfo::new("Notch", Uuid::from_u128(3)).on("survival"),
            ],
            servers: vec!["lobby".into(), "survival".into()],
            ..Self::default()
        }
    }

    pub fn delivered(&self) -> Vec<(String, String)> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<(Option<String>, String)> {
        self.commands.lock().unwrap().clone()
    }
}

pub fn steve_uuid() -> Uuid {
    Uuid::from_u128(1)
}

impl Platform for MockPlatform {
    fn find_player(&self, key: &PlayerKey) -> Option<PlayerInfo> {
        self.players.iter().find(|p| p.matches(key)).cloned()
    }

    fn online_players(&self) -> Vec<PlayerInfo> {
        self.players.clone()
    }

    fn players_on(&self, server: &str) -> Option<Vec<PlayerInfo>> {
        if !self.servers.iter().any(|s| s == server) {
            return None;
        }
        Some(
            self.players
                .iter()
                .filter(|p| p.server.as_deref() == Some(server))
                .cloned()
                .collect(),
        )
    }

    fn server_names(&self) -> Vec<String> {
        self.servers.clone()
    }

    fn deliver(&self, player: &PlayerInfo, text: &str) {
        self.delivered
            .lock()
            .unwrap()
            .push((player.name.clone(), text.to_string()));
    }

    fn dispatch_command(&self, server: Option<&str>, line: &str) -> Result<(), HandlerError> {
        if let Some(server) = server {
            if !self.servers.iter().any(|s| s == server) {
                return Err(HandlerError::Platform(format!("unknown server {server}")));
            }
        }
        self.commands
            .lock()
            .unwrap()
            .push((server.map(str::to_string), line.to_string()));
        Ok(())
    }
}

/// The six moderation commands, plus a couple of extra aliases.
pub fn moderation_grammar() -> Arc<CommandGrammar> {
    Arc::new(
        CommandGrammar::from_tables(
            [
                ("kick", vec!["kick", "k"]),
                ("ban", vec!["ban", "eban"]),
                ("tempban", vec!["tempban", "tban"]),
                ("unban", vec!["unban"]),
                ("timeout", vec!["timeout", "mute"]),
                ("untimeout", vec!["untimeout", "unmute"]),
            ],
            [
                ("kick", "kick <target> [reason]"),
                ("ban", "ban <target> [reason]"),
                ("tempban", "tempban <target> <duration> [reason]"),
                ("unban", "unban <target> [reason]"),
                ("timeout", "timeout <target> <duration> [reason]"),
                ("untimeout", "untimeout <target> [reason]"),
            ],
        )
        .unwrap(),
    )
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MockError(pub String);

/// The relay's side of one mock connection.
pub struct RelayEnd {
    /// Frames the client sent.
    pub from_client: mpsc::UnboundedReceiver<String>,
    /// `Some(frame)` delivers a frame, `None` closes from the relay side.
    pub to_client: mpsc::UnboundedSender<Option<String>>,
    /// Set once the client called `close`.
    pub closed: Arc<AtomicBool>,
}

impl RelayEnd {
    pub async fn next_frame(&mut self) -> serde_json::Value {
        let frame = self.from_client.recv().await.expect("client hung up");
        serde_json::from_str(&frame).expect("client sent invalid JSON")
    }

    pub fn send(&self, frame: &str) {
        self.to_client.send(Some(frame.to_string())).unwrap();
    }

    pub fn close(&self) {
        let _ = self.to_client.send(None);
    }
}

pub struct MockConnection {
    id: ConnectionId,
    to_relay: mpsc::UnboundedSender<String>,
    from_relay: tokio::sync::Mutex<mpsc::UnboundedReceiver<Option<String>>>,
    closed: Arc<AtomicBool>,
}

impl Connection for MockConnection {
    type Error = MockError;

    async fn send(&self, frame: &str) -> Result<(), MockError> {
        self.to_relay
            .send(frame.to_string())
            .map_err(|_| MockError("relay gone".into()))
    }

    async fn recv(&self) -> Result<Option<String>, MockError> {
        match self.from_relay.lock().await.recv().await {
            Some(frame) => Ok(frame),
            None => Err(MockError("pipe dropped".into())),
        }
    }

    async fn close(&self) -> Result<(), MockError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}

/// Dials according to a script: each entry says whether that attempt
/// succeeds. Once the script runs out every attempt fails.
#[derive(Clone)]
pub struct MockDialer {
    script: Arc<Mutex<VecDeque<bool>>>,
    attempts: Arc<Mutex<Vec<Instant>>>,
    relays: mpsc::UnboundedSender<RelayEnd>,
    next_id: Arc<AtomicUsize>,
}

impl MockDialer {
    pub fn new(script: impl IntoIterator<Item = bool>) -> (Self, mpsc::UnboundedReceiver<RelayEnd>) {
        let (relays, rx) = mpsc::unbounded_channel();
        let dialer = Self {
            script: Arc::new(Mutex::new(script.into_iter().collect())),
            attempts: Arc::default(),
            relays,
            next_id: Arc::new(AtomicUsize::new(1)),
        };
        (dialer, rx)
    }

    /// Adds outcomes for later attempts.
    pub fn push(&self, outcomes: impl IntoIterator<Item = bool>) {
        self.script.lock().unwrap().extend(outcomes);
    }

    /// When each attempt happened.
    pub fn attempts(&self) -> Vec<Instant> {
        self.attempts.lock().unwrap().clone()
    }
}

impl Dialer for MockDialer {
    type Connection = MockConnection;
    type Error = MockError;

    async fn connect(&self) -> Result<MockConnection, MockError> {
        self.attempts.lock().unwrap().push(Instant::now());
        let succeed = self.script.lock().unwrap().pop_front().unwrap_or(false);
        if !succeed {
            return Err(MockError("connection refused".into()));
        }

        let (to_relay, from_client) = mpsc::unbounded_channel();
        let (to_client, from_relay) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as u64;

        let _ = self.relays.send(RelayEnd {
            from_client,
            to_client,
            closed: closed.clone(),
        });
        Ok(MockConnection {
            id: ConnectionId::new(id),
            to_relay,
            from_relay: tokio::sync::Mutex::new(from_relay),
            closed,
        })
    }

    fn endpoint(&self) -> &str {
        "mock://relay"
    }
}

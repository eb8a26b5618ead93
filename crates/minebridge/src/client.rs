//! `BridgeClient` builder and connection supervisor.
//!
//! This is the entry point for running a bridge. It ties together all the
//! layers: transport → protocol → router, driven by the session rules.
//!
//! ```text
//!                 ┌──────────── ClientHandle ────────────┐
//!                 │ state() send() reconnect() close()   │
//!                 └──────────────────┬───────────────────┘
//!                                    │ Arc<Shared>
//!   initial connect ──▶ session task ──(lost)──▶ reconnect worker
//!                           ▲                          │
//!                           └──────── connected ───────┘
//! ```
//!
//! Exactly one session task runs at a time, and at most one reconnect
//! worker. The connection state is published through a `watch` channel;
//! handlers and the handle queue outbound frames on an unbounded `mpsc`
//! channel that only the live session drains.

use std::sync::{Arc, Mutex, PoisonError};

use minebridge_protocol::Envelope;
use minebridge_router::{
    ActionModule, ActionRouter, OutboundError, Outbound, Responder, RouterError,
};
use minebridge_session::{
    ConnectionState, Credentials, ReconnectCycle, ReconnectGate, ReconnectPolicy,
};
use minebridge_transport::{Connection, Dialer, WebSocketDialer};
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::handler::{CloseReason, run_session, shutdown_requested};
use crate::{BridgeConfig, MineBridgeError};

// ---------------------------------------------------------------------------
// Link: state + outbound queue, shared with every Responder
// ---------------------------------------------------------------------------

/// Connection state plus the sending half of the outbound queue.
///
/// Implements [`Outbound`], so it backs every [`Responder`] the router
/// hands out.
pub(crate) struct Link {
    state: watch::Sender<ConnectionState>,
    frames: mpsc::UnboundedSender<String>,
}

impl Link {
    fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (frames, rx) = mpsc::unbounded_channel();
        let (state, _) = watch::channel(ConnectionState::Connecting);
        (Self { state, frames }, rx)
    }

    pub(crate) fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Moves to `to` if that is a legal edge from the current state.
    ///
    /// Returns `false` (and changes nothing) otherwise, which is how races
    /// between shutdown, reconnect and session end are settled.
    pub(crate) fn transition(&self, to: ConnectionState) -> bool {
        let mut from = None;
        self.state.send_if_modified(|current| {
            if current.can_transition_to(to) {
                from = Some(*current);
                *current = to;
                true
            } else {
                false
            }
        });

        match from {
            Some(from) => {
                tracing::debug!(%from, %to, "connection state changed");
                true
            }
            None => {
                tracing::trace!(current = %self.state(), %to, "state transition skipped");
                false
            }
        }
    }
}

impl Outbound for Link {
    fn send_frame(&self, frame: String) -> Result<(), OutboundError> {
        if !self.state().is_open() {
            return Err(OutboundError::NotConnected);
        }
        self.frames.send(frame).map_err(|_| OutboundError::Closed)
    }
}

// ---------------------------------------------------------------------------
// Shared supervisor state
// ---------------------------------------------------------------------------

/// Everything the session task, the reconnect worker and the handle share.
pub(crate) struct Shared<D: Dialer> {
    pub(crate) dialer: D,
    pub(crate) router: ActionRouter,
    pub(crate) credentials: Credentials,
    pub(crate) policy: ReconnectPolicy,
    pub(crate) link: Arc<Link>,
    pub(crate) outbound: tokio::sync::Mutex<mpsc::UnboundedReceiver<String>>,
    pub(crate) shutdown: watch::Sender<bool>,
    gate: ReconnectGate,
    session: Mutex<Option<JoinHandle<()>>>,
}

/// Starts serving `conn` unless a session is already up.
///
/// Returns `false` (and closes `conn`) if the state machine refuses to
/// enter `Authenticating`, i.e. another session won the race or the client
/// was shut down meanwhile.
fn start_session<D: Dialer>(shared: &Arc<Shared<D>>, conn: D::Connection) -> bool {
    if !shared.link.transition(ConnectionState::Authenticating) {
        tracing::debug!(conn_id = %conn.id(), "dropping surplus connection");
        tokio::spawn(async move {
            let _ = conn.close().await;
        });
        return false;
    }

    let task_shared = Arc::clone(shared);
    let handle = tokio::spawn(async move {
        let reason = run_session(&task_shared, conn).await;
        session_ended(&task_shared, reason);
    });
    *shared
        .session
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = Some(handle);
    true
}

fn session_ended<D: Dialer>(shared: &Arc<Shared<D>>, reason: CloseReason) {
    match reason {
        CloseReason::Intentional => {
            shared.link.transition(ConnectionState::Closed);
            tracing::info!("relay connection closed");
        }
        CloseReason::Remote | CloseReason::Error(_) => {
            tracing::warn!(%reason, "relay connection lost");
            if shared.link.transition(ConnectionState::Reconnecting) {
                spawn_reconnect(shared);
            }
        }
    }
}

/// Starts a reconnect worker unless one is already running.
fn spawn_reconnect<D: Dialer>(shared: &Arc<Shared<D>>) {
    let Some(cycle) = shared.gate.try_begin() else {
        tracing::debug!("reconnect already in progress");
        return;
    };
    tokio::spawn(reconnect_worker(Arc::clone(shared), cycle));
}

async fn initial_connect<D: Dialer>(shared: Arc<Shared<D>>) {
    tracing::info!(endpoint = shared.dialer.endpoint(), "connecting to relay");
    match shared.dialer.connect().await {
        Ok(conn) => {
            start_session(&shared, conn);
        }
        Err(e) => {
            tracing::warn!(error = %e, "initial connect failed");
            if shared.link.transition(ConnectionState::Reconnecting) {
                spawn_reconnect(&shared);
            }
        }
    }
}

/// Retries with backoff until connected, shut down, or out of attempts.
///
/// Attempt 1 waits `initial_delay`; after failed attempt `n` the wait is
/// [`ReconnectPolicy::next_delay`]`(n)`.
async fn reconnect_worker<D: Dialer>(shared: Arc<Shared<D>>, cycle: ReconnectCycle) {
    let mut shutdown = shared.shutdown.subscribe();
    let max_attempts = shared.policy.max_attempts;
    let mut delay = shared.policy.initial_delay;

    for attempt in 1..=max_attempts {
        tracing::info!(
            attempt,
            max_attempts,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "scheduling reconnect"
        );
        tokio::select! {
            biased;
            () = shutdown_requested(&mut shutdown) => {
                tracing::debug!("reconnect cancelled by shutdown");
                return;
            }
            () = tokio::time::sleep(delay) => {}
        }

        let state = shared.link.state();
        if state.is_open() {
            tracing::debug!("already connected; reconnect cycle ends");
            return;
        }
        if state.is_closed() {
            return;
        }

        match shared.dialer.connect().await {
            Ok(conn) => {
                // Release the gate first: if this session drops at once,
                // its close must be able to start a new cycle.
                drop(cycle);
                if start_session(&shared, conn) {
                    tracing::info!(attempt, "reconnected to relay");
                }
                return;
            }
            Err(e) => {
                tracing::warn!(attempt, error = %e, "reconnect attempt failed");
                delay = shared.policy.next_delay(attempt);
            }
        }
    }

    tracing::error!(max_attempts, "giving up on relay connection");
    shared.link.transition(ConnectionState::Closed);
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Entry point: `BridgeClient::builder(..)` or `BridgeClient::from_config(..)`.
///
/// # Example
///
/// ```rust,ignore
/// use minebridge::prelude::*;
///
/// let config = BridgeConfig::load(Path::new("minebridge.toml"))?;
/// let client = BridgeClient::from_config(&config)?
///     .register(MessageActions::new(platform.clone()))?
///     .connect();
/// client.wait_closed().await;
/// ```
#[derive(Debug)]
pub struct BridgeClient;

impl BridgeClient {
    pub fn builder<D: Dialer>(dialer: D, credentials: Credentials) -> BridgeClientBuilder<D> {
        BridgeClientBuilder::new(dialer, credentials)
    }

    /// Builds a TLS WebSocket client from a validated configuration.
    ///
    /// # Errors
    /// - [`MineBridgeError::Config`] if the configuration is invalid
    /// - [`MineBridgeError::Transport`] if the relay certificate is missing
    ///   or unusable
    pub fn from_config(
        config: &BridgeConfig,
    ) -> Result<BridgeClientBuilder<WebSocketDialer>, MineBridgeError> {
        config.validate()?;
        let dialer = WebSocketDialer::with_trust_dir(
            &config.relay.host,
            config.relay.port,
            &config.relay.certs_dir,
        )?;
        Ok(Self::builder(dialer, config.credentials()?).policy(config.policy()?))
    }
}

/// Collects the dialer, credentials, policy and action modules.
pub struct BridgeClientBuilder<D: Dialer> {
    dialer: D,
    credentials: Credentials,
    policy: ReconnectPolicy,
    router: ActionRouter,
    link: Arc<Link>,
    outbound: mpsc::UnboundedReceiver<String>,
}

impl<D: Dialer> BridgeClientBuilder<D> {
    fn new(dialer: D, credentials: Credentials) -> Self {
        let (link, outbound) = Link::new();
        let link = Arc::new(link);
        let router = ActionRouter::new(Responder::new(link.clone()));
        Self {
            dialer,
            credentials,
            policy: ReconnectPolicy::default(),
            router,
            link,
            outbound,
        }
    }

    /// Sets the reconnect policy.
    pub fn policy(mut self, policy: ReconnectPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Registers an action module.
    ///
    /// # Errors
    /// [`RouterError`] if the module declares no bindings or an empty tag.
    pub fn register<M: ActionModule>(mut self, module: M) -> Result<Self, RouterError> {
        self.router.register(module)?;
        Ok(self)
    }

    /// A responder for code outside the action modules (e.g. a
    /// [`CommandListener`](crate::CommandListener) built before connecting).
    pub fn responder(&self) -> Responder {
        self.router.responder().clone()
    }

    /// Spawns the supervisor and returns a handle to it.
    ///
    /// Must be called within a Tokio runtime. The first dial happens in the
    /// background; a failure there enters the reconnect cycle.
    pub fn connect(self) -> ClientHandle<D> {
        let (shutdown, _) = watch::channel(false);
        let shared = Arc::new(Shared {
            dialer: self.dialer,
            router: self.router,
            credentials: self.credentials,
            policy: self.policy,
            link: self.link,
            outbound: tokio::sync::Mutex::new(self.outbound),
            shutdown,
            gate: ReconnectGate::new(),
            session: Mutex::new(None),
        });

        tracing::debug!(router = ?shared.router, "bridge client starting");
        tokio::spawn(initial_connect(Arc::clone(&shared)));
        ClientHandle { shared }
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Controls a running client. Cheap to clone.
///
/// Dropping every handle does not stop the client; call
/// [`close`](Self::close).
pub struct ClientHandle<D: Dialer> {
    shared: Arc<Shared<D>>,
}

impl<D: Dialer> Clone for ClientHandle<D> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<D: Dialer> ClientHandle<D> {
    pub fn state(&self) -> ConnectionState {
        self.shared.link.state()
    }

    /// Receives every state change from now on.
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.shared.link.state.subscribe()
    }

    /// Encodes and queues an envelope for the relay.
    ///
    /// # Errors
    /// [`MineBridgeError::Handler`] if encoding fails or no session is open.
    pub fn send<T: Serialize>(&self, envelope: &Envelope<T>) -> Result<(), MineBridgeError> {
        self.shared.router.responder().send(envelope)?;
        Ok(())
    }

    pub fn responder(&self) -> Responder {
        self.shared.router.responder().clone()
    }

    /// Makes one immediate connection attempt.
    ///
    /// Returns `Ok(false)` without dialing if a session is already open.
    /// After [`close`](Self::close) this restarts the client; if that dial
    /// fails the usual reconnect cycle takes over.
    ///
    /// # Errors
    /// The dialer's error if the attempt fails.
    pub async fn reconnect(&self) -> Result<bool, D::Error> {
        let shared = &self.shared;
        if shared.link.state().is_open() {
            tracing::debug!("manual reconnect skipped: already connected");
            return Ok(false);
        }

        shared.shutdown.send_replace(false);
        shared.link.transition(ConnectionState::Connecting);

        tracing::info!(endpoint = shared.dialer.endpoint(), "manual reconnect");
        match shared.dialer.connect().await {
            Ok(conn) => Ok(start_session(shared, conn)),
            Err(e) => {
                tracing::warn!(error = %e, "manual reconnect failed");
                if shared.link.transition(ConnectionState::Reconnecting) {
                    spawn_reconnect(shared);
                }
                Err(e)
            }
        }
    }

    /// Shuts down for good: no reconnects follow.
    ///
    /// Waits for the live session (if any) to send its close frame.
    pub async fn close(&self) {
        self.shared.shutdown.send_replace(true);
        self.shared.link.transition(ConnectionState::Closed);

        let session = self
            .shared
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(session) = session {
            let _ = session.await;
        }
        tracing::info!("bridge client closed");
    }

    /// Resolves once the client reaches `Closed` (shutdown or retries
    /// exhausted).
    pub async fn wait_closed(&self) {
        let mut state = self.subscribe_state();
        let _ = state.wait_for(|s| s.is_closed()).await;
    }
}

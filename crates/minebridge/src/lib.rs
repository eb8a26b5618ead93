//! # MineBridge
//!
//! Connects game servers to a central relay over a persistent, pinned-TLS
//! WebSocket, and exchanges chat, moderation commands and player queries
//! as JSON envelopes.
//!
//! The meta crate ties the layers together:
//!
//! - [`BridgeClient`] / [`ClientHandle`]: connection manager (authenticate,
//!   detect loss, reconnect with backoff)
//! - [`actions`]: handlers for relay actions, generic over a [`Platform`]
//! - [`CommandListener`]: relays locally typed moderation commands
//! - [`BridgeConfig`]: TOML configuration; [`logging`] installs output
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use minebridge::prelude::*;
//!
//! // Implement Platform for your server, then:
//! // let config = BridgeConfig::load(Path::new("minebridge.toml"))?;
//! // let platform = Arc::new(MyPlatform::new());
//! // let client = BridgeClient::from_config(&config)?
//! //     .register(MessageActions::new(platform.clone()))?
//! //     .register(PlayerActions::new(platform))?
//! //     .connect();
//! // client.wait_closed().await;
//! ```

pub mod actions;
mod client;
mod config;
mod error;
mod handler;
mod listener;
pub mod logging;
mod platform;

pub use actions::{CommandActions, MessageActions, MessageTable, PlayerActions};
pub use client::{BridgeClient, BridgeClientBuilder, ClientHandle};
pub use config::{BridgeConfig, ConfigError, LoggingSettings, ReconnectSettings, RelaySettings};
pub use error::MineBridgeError;
pub use listener::{CONSOLE, CommandListener};
pub use platform::{Platform, PlayerInfo};

/// Convenient re-exports for the common case.
///
/// ```rust
/// use minebridge::prelude::*;
/// ```
pub mod prelude {
    pub use crate::actions::{CommandActions, MessageActions, MessageTable, PlayerActions};
    pub use crate::client::{BridgeClient, BridgeClientBuilder, ClientHandle};
    pub use crate::config::BridgeConfig;
    pub use crate::error::MineBridgeError;
    pub use crate::listener::{CONSOLE, CommandListener};
    pub use crate::platform::{Platform, PlayerInfo};

    pub use minebridge_command::{CommandGrammar, ParsedCommand};
    pub use minebridge_protocol::{
        ALL_SERVERS, Envelope, MessageType, PlayerKey, PlayerRef, ServerTarget, actions,
    };
    pub use minebridge_router::{
        ActionModule, DispatchOutcome, HandlerError, ModuleBindings, Responder,
    };
    pub use minebridge_session::{ConnectionState, Credentials, ReconnectPolicy};
    pub use minebridge_transport::{Connection, ConnectionId, Dialer, WebSocketDialer};
}

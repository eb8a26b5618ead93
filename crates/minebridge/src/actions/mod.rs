//! Handlers for relay → game actions.
//!
//! Each module groups related actions and is generic over the
//! [`Platform`](crate::Platform) it acts on. Share one platform between
//! them with an `Arc`:
//!
//! ```rust,ignore
//! let platform = Arc::new(MyPlatform::new());
//! BridgeClient::builder(dialer, credentials)
//!     .register(MessageActions::new(platform.clone()))?
//!     .register(CommandActions::new(platform.clone(), grammar))?
//!     .register(PlayerActions::new(platform))?
//!     .connect();
//! ```

mod command;
mod message;
mod player;

pub use command::CommandActions;
pub use message::{MessageActions, MessageTable};
pub use player::{PlayerActions, server_response, status_response};

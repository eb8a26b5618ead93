//! Connection lifecycle for MineBridge.
//!
//! This crate holds the pieces of the connection manager that don't need a
//! socket or a runtime, so they can be tested in isolation:
//!
//! 1. **State machine** ([`ConnectionState`]): which transitions are legal
//! 2. **Backoff** ([`ReconnectPolicy`]): how long to wait between attempts
//! 3. **Single flight** ([`ReconnectGate`]): at most one reconnect cycle
//! 4. **Credentials** ([`Credentials`]): the `authenticate` frame
//!
//! # How it fits in the stack
//!
//! ```text
//! minebridge (client supervisor)  ← drives the state machine, sleeps per policy
//!     ↕
//! Session Layer (this crate)      ← rules, no I/O
//!     ↕
//! Protocol Layer (below)          ← Envelope, Authenticate
//! ```

mod credentials;
mod error;
mod gate;
mod policy;
mod state;

pub use credentials::Credentials;
pub use error::SessionError;
pub use gate::{ReconnectCycle, ReconnectGate};
pub use policy::ReconnectPolicy;
pub use state::ConnectionState;

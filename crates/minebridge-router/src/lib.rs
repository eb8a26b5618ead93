//! Action routing for MineBridge.
//!
//! Inbound frames carry an `action` tag. This crate maps each tag to a
//! handler registered by an [`ActionModule`], decodes the frame into the
//! payload type that handler expects, and calls it:
//!
//! - **Modules** ([`ActionModule`], [`ModuleBindings`]): groups of handlers
//!   plus the tags they answer to.
//! - **Router** ([`ActionRouter`], [`DispatchOutcome`]): the registry and
//!   the dispatch boundary. No handler failure escapes `dispatch`.
//! - **Replies** ([`Responder`], [`Outbound`]): the handle modules use to
//!   send envelopes back to the relay.
//!
//! ```text
//! Connection manager ──frame──▶ ActionRouter::dispatch ──▶ handler(&module, Envelope<T>)
//!        ▲                                                        │
//!        └──────────────── Outbound ◀── Responder::send ◀─────────┘
//! ```

mod error;
mod module;
mod responder;
mod router;

pub use error::{HandlerError, OutboundError, RouterError};
pub use module::{ActionModule, ModuleBindings, PayloadShape};
pub use responder::{Outbound, Responder};
pub use router::{ActionRouter, DispatchOutcome};

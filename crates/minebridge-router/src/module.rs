//! Action modules and the bindings they declare.
//!
//! A module is a value (it may hold configuration, a platform handle, a
//! [`Responder`]) plus a static list of `(action tag, payload shape,
//! callback)` bindings. Callbacks are plain functions taking `&Self`, so a
//! module reads like an ordinary `impl` block:
//!
//! ```rust
//! use minebridge_protocol::{Envelope, SendGlobalMessage};
//! use minebridge_router::{ActionModule, HandlerError, ModuleBindings};
//!
//! struct Announcer;
//!
//! impl Announcer {
//!     fn global(&self, env: Envelope<SendGlobalMessage>) -> Result<(), HandlerError> {
//!         println!("{}", env.body.message);
//!         Ok(())
//!     }
//! }
//!
//! impl ActionModule for Announcer {
//!     fn bindings(b: &mut ModuleBindings<Self>) {
//!         b.on("send-global-message", Self::global);
//!     }
//! }
//! ```

use std::any::type_name;

use serde::de::DeserializeOwned;
use serde_json::Value;

use minebridge_protocol::Envelope;

use crate::{HandlerError, Responder};

/// A group of related action handlers.
///
/// `Sized + 'static` because the router takes ownership of the module and
/// shares it between its bindings behind an `Arc`.
pub trait ActionModule: Send + Sync + Sized + 'static {
    /// Receives the reply handle. Called exactly once, when the module is
    /// registered, before any of its handlers can run. Default: ignore it.
    fn attach(&mut self, _responder: Responder) {}

    /// Declares this module's bindings.
    fn bindings(bindings: &mut ModuleBindings<Self>);
}

// ---------------------------------------------------------------------------
// Bindings
// ---------------------------------------------------------------------------

/// How a handler wants its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// The raw frame text, undecoded.
    Raw,
    /// A typed envelope; the string is the body's type name (for logs).
    Typed(&'static str),
}

/// Failure of a typed call: either the frame didn't fit the payload type,
/// or the handler itself failed.
pub(crate) enum CallError {
    Payload(serde_json::Error),
    Handler(HandlerError),
}

type RawFn<M> = Box<dyn Fn(&M, &str) -> Result<(), HandlerError> + Send + Sync>;
type TypedFn<M> = Box<dyn Fn(&M, Value) -> Result<(), CallError> + Send + Sync>;

pub(crate) enum Callback<M> {
    Raw(RawFn<M>),
    Typed(TypedFn<M>),
}

pub(crate) struct Binding<M> {
    pub(crate) tag: String,
    pub(crate) shape: PayloadShape,
    pub(crate) callback: Callback<M>,
}

/// Collects a module's bindings during registration.
pub struct ModuleBindings<M> {
    pub(crate) entries: Vec<Binding<M>>,
}

impl<M: ActionModule> ModuleBindings<M> {
    pub(crate) fn collect() -> Self {
        let mut bindings = Self {
            entries: Vec::new(),
        };
        M::bindings(&mut bindings);
        bindings
    }

    /// Binds `tag` to a handler expecting an `Envelope<T>`.
    ///
    /// The same handler may be bound to several tags.
    pub fn on<T, F>(&mut self, tag: &str, handler: F) -> &mut Self
    where
        T: DeserializeOwned + 'static,
        F: Fn(&M, Envelope<T>) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        let callback: TypedFn<M> = Box::new(move |module, value| {
            let envelope: Envelope<T> =
                serde_json::from_value(value).map_err(CallError::Payload)?;
            handler(module, envelope).map_err(CallError::Handler)
        });
        self.entries.push(Binding {
            tag: tag.to_string(),
            shape: PayloadShape::Typed(type_name::<T>()),
            callback: Callback::Typed(callback),
        });
        self
    }

    /// Binds `tag` to a handler that receives the raw frame.
    pub fn on_raw<F>(&mut self, tag: &str, handler: F) -> &mut Self
    where
        F: Fn(&M, &str) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.entries.push(Binding {
            tag: tag.to_string(),
            shape: PayloadShape::Raw,
            callback: Callback::Raw(Box::new(handler)),
        });
        self
    }

    /// Number of bindings declared so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

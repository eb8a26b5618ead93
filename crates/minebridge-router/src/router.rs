//! Action registry and the dispatch boundary.
//!
//! ```text
//!   raw frame ──parse──▶ Value ──action──▶ HashMap<tag, Entry>
//!                                               │
//!                         Raw:   handler(&module, frame)
//!                         Typed: handler(&module, Envelope<T>::from(value))
//! ```
//!
//! Nothing that happens inside `dispatch` escapes it: malformed frames,
//! unknown tags, payload mismatches, handler errors and handler panics all
//! become a [`DispatchOutcome`] and a log line.

use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use serde_json::Value;

use crate::module::{Binding, CallError, Callback};
use crate::{ActionModule, ModuleBindings, PayloadShape, Responder, RouterError};

type Route = Box<dyn Fn(&str, Value) -> Result<(), CallError> + Send + Sync>;

struct Entry {
    module: &'static str,
    shape: PayloadShape,
    route: Route,
}

/// What happened to one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A handler ran to completion.
    Handled { action: String },
    /// The frame is not JSON.
    Malformed { error: String },
    /// The frame has no non-empty string `action`.
    MissingAction,
    /// No binding for this tag.
    UnknownAction { action: String },
    /// The frame doesn't fit the handler's payload type.
    PayloadMismatch { action: String, error: String },
    /// The handler returned an error.
    HandlerFailed { action: String, error: String },
    /// The handler panicked.
    HandlerPanicked { action: String, message: String },
}

impl DispatchOutcome {
    /// Returns `true` only if a handler matched and ran successfully.
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled { .. })
    }

    /// The action tag, when one could be read from the frame.
    pub fn action(&self) -> Option<&str> {
        match self {
            Self::Handled { action }
            | Self::UnknownAction { action }
            | Self::PayloadMismatch { action, .. }
            | Self::HandlerFailed { action, .. }
            | Self::HandlerPanicked { action, .. } => Some(action),
            Self::Malformed { .. } | Self::MissingAction => None,
        }
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handled { action } => write!(f, "handled {action}"),
            Self::Malformed { error } => write!(f, "malformed frame: {error}"),
            Self::MissingAction => write!(f, "frame has no action"),
            Self::UnknownAction { action } => write!(f, "unknown action {action}"),
            Self::PayloadMismatch { action, error } => {
                write!(f, "payload mismatch for {action}: {error}")
            }
            Self::HandlerFailed { action, error } => {
                write!(f, "handler for {action} failed: {error}")
            }
            Self::HandlerPanicked { action, message } => {
                write!(f, "handler for {action} panicked: {message}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ActionRouter
// ---------------------------------------------------------------------------

/// Maps action tags to handlers.
///
/// Built mutably during startup, then frozen behind an `Arc` and only read.
pub struct ActionRouter {
    responder: Responder,
    routes: HashMap<String, Entry>,
}

impl ActionRouter {
    /// Creates an empty router. `responder` is handed to every module that
    /// gets registered.
    pub fn new(responder: Responder) -> Self {
        Self {
            responder,
            routes: HashMap::new(),
        }
    }

    /// Registers every binding of `module`.
    ///
    /// The module's [`attach`](ActionModule::attach) runs once, before its
    /// bindings go live. A tag that is already bound is overwritten (last
    /// registration wins).
    ///
    /// # Errors
    /// [`RouterError`] if the module declares no bindings or an empty tag;
    /// nothing is registered in that case.
    pub fn register<M: ActionModule>(&mut self, mut module: M) -> Result<(), RouterError> {
        let module_name = type_name::<M>();
        let bindings = ModuleBindings::<M>::collect();

        if bindings.is_empty() {
            return Err(RouterError::NoBindings {
                module: module_name,
            });
        }
        if bindings.entries.iter().any(|b| b.tag.is_empty()) {
            return Err(RouterError::EmptyActionTag {
                module: module_name,
            });
        }

        module.attach(self.responder.clone());
        let module = Arc::new(module);

        for Binding {
            tag,
            shape,
            callback,
        } in bindings.entries
        {
            let module = Arc::clone(&module);
            let route: Route = match callback {
                Callback::Raw(handler) => {
                    Box::new(move |raw, _| handler(&*module, raw).map_err(CallError::Handler))
                }
                Callback::Typed(handler) => Box::new(move |_, value| handler(&*module, value)),
            };

            let entry = Entry {
                module: module_name,
                shape,
                route,
            };
            if let Some(previous) = self.routes.insert(tag.clone(), entry) {
                tracing::debug!(
                    action = %tag,
                    previous = previous.module,
                    module = module_name,
                    "action binding replaced"
                );
            }
        }

        tracing::debug!(module = module_name, total = self.routes.len(), "module registered");
        Ok(())
    }

    /// Returns `true` if `action` has a binding.
    pub fn contains(&self, action: &str) -> bool {
        self.routes.contains_key(action)
    }

    /// The payload shape bound to `action`.
    pub fn shape(&self, action: &str) -> Option<PayloadShape> {
        self.routes.get(action).map(|e| e.shape)
    }

    /// Number of bound action tags.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// All bound action tags, in no particular order.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn responder(&self) -> &Responder {
        &self.responder
    }

    /// Routes one inbound frame to its handler.
    ///
    /// Never panics and never returns an error; see [`DispatchOutcome`].
    pub fn dispatch(&self, frame: &str) -> DispatchOutcome {
        let outcome = self.route(frame);
        log_outcome(&outcome);
        outcome
    }

    fn route(&self, frame: &str) -> DispatchOutcome {
        let value: Value = match serde_json::from_str(frame) {
            Ok(value) => value,
            Err(e) => {
                return DispatchOutcome::Malformed {
                    error: e.to_string(),
                };
            }
        };

        let action = match value.get("action").and_then(Value::as_str) {
            Some(action) if !action.is_empty() => action.to_string(),
            _ => return DispatchOutcome::MissingAction,
        };

        let Some(entry) = self.routes.get(&action) else {
            return DispatchOutcome::UnknownAction { action };
        };

        match catch_unwind(AssertUnwindSafe(|| (entry.route)(frame, value))) {
            Ok(Ok(())) => DispatchOutcome::Handled { action },
            Ok(Err(CallError::Payload(e))) => DispatchOutcome::PayloadMismatch {
                action,
                error: e.to_string(),
            },
            Ok(Err(CallError::Handler(e))) => DispatchOutcome::HandlerFailed {
                action,
                error: e.to_string(),
            },
            Err(panic) => DispatchOutcome::HandlerPanicked {
                action,
                message: panic_message(panic.as_ref()),
            },
        }
    }
}

impl fmt::Debug for ActionRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut actions: Vec<_> = self.actions().collect();
        actions.sort_unstable();
        f.debug_struct("ActionRouter")
            .field("actions", &actions)
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn log_outcome(outcome: &DispatchOutcome) {
    match outcome {
        DispatchOutcome::Handled { action } => {
            tracing::trace!(%action, "frame handled");
        }
        DispatchOutcome::Malformed { error } => {
            tracing::warn!(%error, "dropping malformed frame");
        }
        DispatchOutcome::MissingAction => {
            tracing::warn!("dropping frame without action");
        }
        DispatchOutcome::UnknownAction { action } => {
            tracing::debug!(%action, "no handler for action");
        }
        DispatchOutcome::PayloadMismatch { action, error } => {
            tracing::warn!(%action, %error, "payload does not match handler");
        }
        DispatchOutcome::HandlerFailed { action, error } => {
            tracing::warn!(%action, %error, "handler failed");
        }
        DispatchOutcome::HandlerPanicked { action, message } => {
            tracing::error!(%action, %message, "handler panicked");
        }
    }
}

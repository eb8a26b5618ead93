//! The connection state machine.

use std::fmt;

use crate::SessionError;

/// Where the single relay connection currently is in its lifecycle.
///
/// ```text
///   Connecting ──socket up──▶ Authenticating ──frame sent──▶ Open
///       │  ▲                        ▲    │                    │
///       │  │                  retry ok   └──── drop ────┐     │ drop
///       │  │                        │                   ▼     ▼
///       │  └── manual ── Closed ◀── Reconnecting ◀──────┴─────┘
///       └──── dial failed ─────────────▲
/// ```
///
/// Any state except `Closed` can also move to `Closed` on an intentional
/// shutdown.
///
/// - **Connecting**: first dial (or a manual dial after `Closed`).
/// - **Authenticating**: the socket is up and the `authenticate` frame is
///   being written.
/// - **Open**: authenticated; inbound frames are dispatched and queued
///   outbound frames are written.
/// - **Reconnecting**: a background cycle is retrying with backoff.
/// - **Closed**: shut down on purpose, or retries exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Connecting,
    Open,
    Authenticating,
    Closed,
    Reconnecting,
}

impl ConnectionState {
    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        use ConnectionState::*;
        matches!(
            (self, target),
            (Connecting, Authenticating | Open | Reconnecting | Closed)
                | (Authenticating, Open | Reconnecting | Closed)
                | (Open, Reconnecting | Closed)
                | (Reconnecting, Authenticating | Open | Closed)
                | (Closed, Connecting)
        )
    }

    /// Checked transition.
    ///
    /// # Errors
    /// [`SessionError::InvalidTransition`] if `target` is not reachable.
    pub fn transition(self, target: Self) -> Result<Self, SessionError> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(SessionError::InvalidTransition {
                from: self,
                to: target,
            })
        }
    }

    /// Returns `true` while a socket is up (authenticated or not).
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open | Self::Authenticating)
    }

    /// Returns `true` once the manager has stopped for good.
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => write!(f, "Connecting"),
            Self::Open => write!(f, "Open"),
            Self::Authenticating => write!(f, "Authenticating"),
            Self::Closed => write!(f, "Closed"),
            Self::Reconnecting => write!(f, "Reconnecting"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConnectionState::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(Connecting.can_transition_to(Authenticating));
        assert!(Authenticating.can_transition_to(Open));
        assert!(Open.can_transition_to(Reconnecting));
        assert!(Reconnecting.can_transition_to(Authenticating));
        assert!(Open.can_transition_to(Closed));
        assert!(Closed.can_transition_to(Connecting));
    }

    #[test]
    fn test_closed_only_reopens_through_connecting() {
        assert!(!Closed.can_transition_to(Open));
        assert!(!Closed.can_transition_to(Reconnecting));
        assert!(!Closed.can_transition_to(Closed));
    }

    #[test]
    fn test_no_self_loops() {
        for s in [Connecting, Open, Authenticating, Closed, Reconnecting] {
            assert!(!s.can_transition_to(s), "{s} -> {s}");
        }
    }

    #[test]
    fn test_transition_error() {
        assert_eq!(
            Closed.transition(Open),
            Err(SessionError::InvalidTransition {
                from: Closed,
                to: Open
            })
        );
        assert_eq!(Open.transition(Closed), Ok(Closed));
    }

    #[test]
    fn test_is_open() {
        assert!(Open.is_open());
        assert!(Authenticating.is_open());
        assert!(!Reconnecting.is_open());
        assert!(!Connecting.is_open());
        assert!(Closed.is_closed());
    }

    #[test]
    fn test_display() {
        assert_eq!(Reconnecting.to_string(), "Reconnecting");
    }
}

//! Log output for binaries embedding the bridge.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! binary's job. `RUST_LOG` wins over the configured level.

use tracing_subscriber::{EnvFilter, fmt};

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, else `level`.
///
/// Returns `false` if a global subscriber was already installed (tests,
/// or a host application that set up its own).
pub fn init(level: &str) -> bool {
    fmt()
        .with_env_filter(filter(level))
        .with_target(true)
        .try_init()
        .is_ok()
}

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

//! Reconnect backoff policy.
//!
//! After failed attempt `n` (1-based) the next attempt waits
//!
//! ```text
//! base(n) = min(max_delay, initial_delay * 2^(n-1))
//! delay(n) = base(n) + uniform(0, jitter_ratio) * base(n)
//! ```
//!
//! With the defaults that is 5s, 10s, 20s, 40s, 60s, 60s, ... plus up to
//! 20% jitter, for at most 10 attempts.

use std::time::Duration;

use rand::Rng;

use crate::SessionError;

/// Largest exponent applied to `initial_delay`; keeps the multiplier
/// within `u32`.
const MAX_SHIFT: u32 = 30;

/// Timing and retry limits for the reconnect cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconnectPolicy {
    /// Wait before the first attempt of a cycle.
    pub initial_delay: Duration,
    /// Upper bound for the pre-jitter delay.
    pub max_delay: Duration,
    /// Attempts per cycle before giving up. `0` disables reconnecting.
    pub max_attempts: u32,
    /// Jitter as a fraction of the base delay, in `0.0..=1.0`.
    pub jitter_ratio: f64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(60),
            max_attempts: 10,
            jitter_ratio: 0.2,
        }
    }
}

impl ReconnectPolicy {
    /// Checks the policy for internal consistency.
    ///
    /// # Errors
    /// [`SessionError::InvalidPolicy`] if the jitter ratio is outside
    /// `0.0..=1.0` or the initial delay exceeds the maximum.
    pub fn validate(&self) -> Result<(), SessionError> {
        if !(0.0..=1.0).contains(&self.jitter_ratio) {
            return Err(SessionError::InvalidPolicy(format!(
                "jitter ratio {} is outside 0.0..=1.0",
                self.jitter_ratio
            )));
        }
        if self.initial_delay > self.max_delay {
            return Err(SessionError::InvalidPolicy(format!(
                "initial delay {:?} exceeds max delay {:?}",
                self.initial_delay, self.max_delay
            )));
        }
        Ok(())
    }

    /// Delay after failed attempt `attempt`, before jitter.
    ///
    /// `attempt` is 1-based; `0` is treated as `1`. Never decreases as
    /// `attempt` grows.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(MAX_SHIFT);
        self.initial_delay
            .saturating_mul(1_u32 << shift)
            .min(self.max_delay)
    }

    /// [`base_delay`](Self::base_delay) plus random jitter drawn from `rng`.
    pub fn jittered_delay<R: Rng + ?Sized>(&self, attempt: u32, rng: &mut R) -> Duration {
        let base = self.base_delay(attempt);
        let factor = self.jitter_ratio * rng.random::<f64>();
        base.saturating_add(base.mul_f64(factor))
    }

    /// [`jittered_delay`](Self::jittered_delay) using the thread-local RNG.
    pub fn next_delay(&self, attempt: u32) -> Duration {
        self.jittered_delay(attempt, &mut rand::rng())
    }

    /// Returns `true` if attempt number `attempt` (1-based) may run.
    pub fn allows(&self, attempt: u32) -> bool {
        attempt >= 1 && attempt <= self.max_attempts
    }
}

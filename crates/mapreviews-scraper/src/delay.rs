//! Randomized inter-request delays.
//!
//! Every page fetch and every retry waits a random duration first, so the
//! request cadence does not look scripted. Retries widen the window
//! exponentially:
//!
//! | Attempt | Window |
//! |---------|--------|
//! | 0 (page fetch) | `[min, max]` |
//! | 1 (first retry) | `[min × 2, max × 2]` |
//! | 2 (second retry) | `[min × 4, max × 4]` |
//!
//! Windows are capped at [`DEFAULT_MAX_DELAY`] (or the configured `max`, if
//! that is larger).

use std::time::Duration;

use mapreviews_core::DelayBounds;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio_util::sync::CancellationToken;

use crate::error::ScraperError;

/// Upper bound on any single backoff wait.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

/// Produces the wait that precedes the given attempt.
///
/// `attempt` is `0` for the first try of a page and `n` for its n-th retry.
pub trait DelayPolicy: Send {
    fn next_delay(&mut self, attempt: u32) -> Duration;
}

/// Uniformly random delay within [`DelayBounds`], doubling per retry attempt.
#[derive(Debug)]
pub struct JitteredDelay<R = StdRng> {
    bounds: DelayBounds,
    max_delay: Duration,
    rng: R,
}

impl JitteredDelay<StdRng> {
    /// Jitter seeded from the operating system.
    #[must_use]
    pub fn new(bounds: DelayBounds) -> Self {
        Self::with_rng(bounds, StdRng::from_os_rng())
    }

    /// Deterministic jitter for reproducible runs and tests.
    #[must_use]
    pub fn seeded(bounds: DelayBounds, seed: u64) -> Self {
        Self::with_rng(bounds, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> JitteredDelay<R> {
    pub fn with_rng(bounds: DelayBounds, rng: R) -> Self {
        Self {
            bounds,
            max_delay: DEFAULT_MAX_DELAY.max(bounds.max()),
            rng,
        }
    }

    /// Overrides the backoff cap. Never lower than the configured `max` bound.
    #[must_use]
    pub fn max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay.max(self.bounds.max());
        self
    }
}

impl<R: Rng + Send> DelayPolicy for JitteredDelay<R> {
    fn next_delay(&mut self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.min(16);
        let lo = self.bounds.min().saturating_mul(factor).min(self.max_delay);
        let hi = self.bounds.max().saturating_mul(factor).min(self.max_delay);
        if hi <= lo {
            return lo;
        }
        let secs = self.rng.random_range(lo.as_secs_f64()..=hi.as_secs_f64());
        Duration::from_secs_f64(secs).clamp(lo, hi)
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl DelayPolicy for NoDelay {
    fn next_delay(&mut self, _attempt: u32) -> Duration {
        Duration::ZERO
    }
}

/// Sleeps for `delay` unless `cancel` fires first.
///
/// # Errors
///
/// Returns [`ScraperError::Cancelled`] if the token is (or becomes) cancelled.
pub async fn wait_cancellable(
    delay: Duration,
    cancel: &CancellationToken,
) -> Result<(), ScraperError> {
    if cancel.is_cancelled() {
        return Err(ScraperError::Cancelled);
    }
    if delay.is_zero() {
        return Ok(());
    }
    tracing::debug!(
        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
        "waiting before next request"
    );
    tokio::select! {
        () = cancel.cancelled() => Err(ScraperError::Cancelled),
        () = tokio::time::sleep(delay) => Ok(()),
    }
}

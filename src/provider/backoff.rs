//! Retry delay policy for the provider transport.

use rand::Rng;
use std::time::Duration;

/// Why a call is being retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryCause {
    RateLimited,
    Network,
}

/// Swappable retry delay policy.
pub trait BackoffStrategy: Send + Sync {
    /// Delay before retry number `attempt` (1-based).
    fn delay(&self, cause: RetryCause, attempt: u32) -> Duration;
}

/// Doubling backoff with jitter for throttling, a short fixed delay with
/// jitter for transient network failures.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    pub rate_limit_base: Duration,
    pub network_base: Duration,
    pub max_jitter: Duration,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            rate_limit_base: Duration::from_millis(6_000),
            network_base: Duration::from_millis(2_000),
            max_jitter: Duration::from_millis(2_000),
        }
    }
}

impl ExponentialBackoff {
    fn jitter(max: Duration) -> Duration {
        let max_ms = max.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
    }
}

impl BackoffStrategy for ExponentialBackoff {
    fn delay(&self, cause: RetryCause, attempt: u32) -> Duration {
        match cause {
            RetryCause::RateLimited => {
                let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
                self.rate_limit_base.saturating_mul(factor) + Self::jitter(self.max_jitter)
            }
            RetryCause::Network => self.network_base + Self::jitter(self.max_jitter / 2),
        }
    }
}

/// Same delay for every retry.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub(crate) struct FixedBackoff(pub Duration);

#[cfg(test)]
impl BackoffStrategy for FixedBackoff {
    fn delay(&self, _cause: RetryCause, _attempt: u32) -> Duration {
        self.0
    }
}

//! Time-based admission for outbound provider calls.
//!
//! The upstream plan allows roughly ten requests per minute, so every
//! call, including retries, is admitted through one `MinIntervalGate`.
//! Time comes from an injectable `Clock` so tests can run on virtual
//! time instead of sleeping for real.

use ::governor::middleware::NoOpMiddleware;
use ::governor::state::{InMemoryState, NotKeyed};
use ::governor::{Quota, RateLimiter};
use async_trait::async_trait;
#[cfg(test)]
use std::sync::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::time::Instant;
use tracing::debug;

use crate::types::InsightError;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Clock whose time only moves when someone sleeps on it.
/// Every sleep is recorded.
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct VirtualClock {
    origin: Instant,
    elapsed: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

#[cfg(test)]
impl VirtualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// Virtual time elapsed since creation.
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Every sleep requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn advance(&self, by: Duration) {
        *self.elapsed.lock().unwrap_or_else(|e| e.into_inner()) += by;
    }
}

#[cfg(test)]
impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[async_trait]
impl Clock for VirtualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(duration);
        self.advance(duration);
        tokio::task::yield_now().await;
    }
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Cooperative cancellation flag, cheap to clone and thread through calls.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

/// Owner side of a `CancelSignal`.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Create a linked handle/signal pair.
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx })
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: self.tx.subscribe(),
        }
    }
}

impl CancelSignal {
    /// A signal that is never raised.
    pub fn never() -> Self {
        let (_, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// `Err(Cancelled)` once the signal is raised.
    pub fn check(&self) -> Result<(), InsightError> {
        if self.is_cancelled() {
            Err(InsightError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolves when the signal is raised; pends forever if it never can be.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|raised| *raised).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Sleep on `clock`, returning early with `Cancelled` if the signal fires.
pub async fn cancellable_sleep(
    clock: &dyn Clock,
    duration: Duration,
    cancel: &CancelSignal,
) -> Result<(), InsightError> {
    cancel.check()?;
    tokio::select! {
        _ = clock.sleep(duration) => Ok(()),
        _ = cancel.cancelled() => Err(InsightError::Cancelled),
    }
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

/// Adapts an injected `Clock` to the rate limiter's clock.
#[derive(Clone)]
struct LimiterClock(Arc<dyn Clock>);

impl ::governor::clock::Clock for LimiterClock {
    type Instant = std::time::Instant;

    fn now(&self) -> Self::Instant {
        self.0.now().into_std()
    }
}

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, LimiterClock, NoOpMiddleware<std::time::Instant>>;

/// Fixed-interval gate: consecutive admissions are at least `interval` apart.
///
/// A one-cell GCRA quota (`Quota::with_period`, burst 1) on the injected
/// clock. Waiters queue on a lock held across the wait, so admissions are
/// serialized in arrival order. A zero interval admits everything.
pub struct MinIntervalGate {
    interval: Duration,
    clock: Arc<dyn Clock>,
    limiter: Option<DirectLimiter>,
    queue: AsyncMutex<()>,
}

impl MinIntervalGate {
    pub fn new(interval: Duration, clock: Arc<dyn Clock>) -> Self {
        let limiter = Quota::with_period(interval)
            .map(|quota| RateLimiter::direct_with_clock(quota, &LimiterClock(clock.clone())));
        Self {
            interval,
            clock,
            limiter,
            queue: AsyncMutex::new(()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Wait for a slot and return the admission time.
    pub async fn admit(&self, cancel: &CancelSignal) -> Result<Instant, InsightError> {
        cancel.check()?;
        let _turn = tokio::select! {
            guard = self.queue.lock() => guard,
            _ = cancel.cancelled() => return Err(InsightError::Cancelled),
        };

        if let Some(limiter) = &self.limiter {
            while let Err(not_until) = limiter.check() {
                let wait = not_until.wait_time_from(self.clock.now().into_std());
                debug!(wait_ms = wait.as_millis() as u64, "Throttling provider call");
                cancellable_sleep(self.clock.as_ref(), wait, cancel).await?;
            }
        }

        cancel.check()?;
        Ok(self.clock.now())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

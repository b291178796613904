//! Back-off Window
//!
//! Fails fast for a fixed window after a transport failure so that one slow
//! service does not stall every subsequent lookup behind the request timeout.

use crate::domain::ports::Clock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Sentinel for "no failure recorded yet".
const NEVER: u64 = u64::MAX;

/// Back-off window state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffState {
    /// Requests allowed
    Idle,
    /// A failure happened less than one window ago - requests blocked
    BackingOff,
}

impl std::fmt::Display for BackoffState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackoffState::Idle => write!(f, "idle"),
            BackoffState::BackingOff => write!(f, "backing-off"),
        }
    }
}

/// Per-instance back-off window.
///
/// Holds the time of the most recent transport failure. State is local to
/// this instance; separate workers each enforce their own window.
pub struct BackoffWindow {
    window: Duration,
    /// Last failure timestamp (clock ms), or NEVER
    last_failure_ms: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl BackoffWindow {
    pub fn new(window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            window,
            last_failure_ms: AtomicU64::new(NEVER),
            clock,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Time left before requests are allowed again, or None if allowed now.
    pub fn remaining(&self) -> Option<Duration> {
        let last = self.last_failure_ms.load(Ordering::SeqCst);
        if last == NEVER {
            return None;
        }

        let elapsed = self.clock.now_ms().saturating_sub(last);
        let window_ms = u64::try_from(self.window.as_millis()).unwrap_or(u64::MAX);

        if elapsed < window_ms {
            Some(Duration::from_millis(window_ms - elapsed))
        } else {
            None
        }
    }

    /// Check if a request is allowed.
    pub fn allow_request(&self) -> bool {
        self.remaining().is_none()
    }

    pub fn state(&self) -> BackoffState {
        if self.allow_request() {
            BackoffState::Idle
        } else {
            BackoffState::BackingOff
        }
    }

    /// Record a transport failure; the window (re)starts now.
    ///
    /// A racing writer holding an older timestamp never moves the window
    /// backwards.
    pub fn record_failure(&self) {
        let now = self.clock.now_ms();
        let _ = self
            .last_failure_ms
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                (last == NEVER || now > last).then_some(now)
            });
        tracing::warn!(
            "geocoding service failure, backing off for {}s",
            self.window.as_secs()
        );
    }

    /// Timestamp of the most recent failure, if any.
    pub fn last_failure_ms(&self) -> Option<u64> {
        match self.last_failure_ms.load(Ordering::SeqCst) {
            NEVER => None,
            ms => Some(ms),
        }
    }

    /// Forget any recorded failure.
    pub fn reset(&self) {
        self.last_failure_ms.store(NEVER, Ordering::SeqCst);
        tracing::info!("geocoding back-off window manually reset");
    }
}

//! Trailing-edge debouncing of a rapidly changing value.
//!
//! The debouncer is clock-agnostic: callers pass `now` explicitly and sleep until
//! [`Debouncer::deadline`] themselves, which keeps the render loop in charge of scheduling
//! and lets tests drive time deterministically.

use tokio::time::{Duration, Instant};

/// Quiet period applied to the filter field unless configured otherwise.
pub const DEFAULT_QUIET_PERIOD_MS: u64 = 500;

/// Delays a value until it has been stable for a full quiet period.
///
/// There is no leading-edge emission and no maximum wait: every push before the deadline
/// restarts the timer.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    current: T,
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    due: Instant,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    /// Create a debouncer whose settled value starts at `initial`.
    pub fn new(delay: Duration, initial: T) -> Self {
        Self {
            delay,
            current: initial,
            pending: None,
        }
    }

    /// Quiet period this debouncer waits for.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The last settled value.
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Record a new raw value, restarting the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            due: now + self.delay,
        });
    }

    /// Instant at which the pending value settles, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due)
    }

    /// Settle the pending value if its quiet period has elapsed.
    ///
    /// Returns the new settled value only when it differs from the previous one; a raw
    /// value that ends up back where it started settles silently.
    pub fn poll_expired(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(pending) if now >= pending.due => {}
            _ => return None,
        }

        let pending = self.pending.take()?;
        if pending.value == self.current {
            return None;
        }
        self.current = pending.value;
        Some(self.current.clone())
    }

    /// Drop any pending value without settling it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Return true when no value is waiting to settle.
    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }
}

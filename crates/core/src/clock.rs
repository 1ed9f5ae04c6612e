//! Monotonic time sources.
//!
//! The profiler never reads wall-clock time directly; it asks a [`Clock`]
//! for an offset from an arbitrary fixed origin. Production sessions run on
//! [`MonotonicClock`]; tests drive a [`ManualClock`] so every measured span
//! is exactly assertable.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A monotonic, high-resolution time source.
///
/// `now` values are offsets from a fixed origin chosen by the clock; only
/// differences between them are meaningful. Implementations must never go
/// backwards.
pub trait Clock: fmt::Debug {
    /// Current offset from the clock's origin.
    fn now(&self) -> Duration;
}

/// System monotonic clock. The origin is the moment of construction.
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-advanced clock for deterministic tests and replay.
///
/// Clones share the underlying counter, so a test can keep one handle and
/// hand another to the session:
///
/// ```
/// use std::time::Duration;
/// use frameprof_core::{ManualClock, ProfileSession};
///
/// let clock = ManualClock::new();
/// let mut session = ProfileSession::with_clock(Box::new(clock.clone()));
/// session.begin("update");
/// clock.advance(Duration::from_millis(4));
/// session.end();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    /// Jump the clock to an absolute offset. Only ever jump forward;
    /// moving a monotonic clock backwards voids its contract.
    pub fn set(&self, to: Duration) {
        let nanos = u64::try_from(to.as_nanos()).unwrap_or(u64::MAX);
        self.nanos.store(nanos, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Relaxed))
    }
}

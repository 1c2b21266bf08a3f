//! Monotonic time source for sessions.
//!
//! Sessions never run a ticking timer. They remember when play started and
//! sample the clock whenever elapsed time is read, so the value cannot drift
//! and nothing keeps running after a session is dropped.
//!
//! Elapsed time is reported in whole tenths of a second, the same
//! granularity as a display that ticks every 100ms.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// A monotonic time source.
///
/// `now` is measured from an arbitrary, fixed origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced clock.
///
/// Clones share the same time, so a host (or a test) can keep one handle and
/// hand another to the game.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Move time forward by `ms` milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Truncate a duration to tenths of a second.
#[must_use]
pub fn tenths_of_second(elapsed: Duration) -> f64 {
    (elapsed.as_millis() / 100) as f64 / 10.0
}

/// Round seconds to one decimal place.
#[must_use]
pub fn round_to_tenth(seconds: f64) -> f64 {
    (seconds * 10.0).round() / 10.0
}

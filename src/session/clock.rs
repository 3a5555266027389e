//! Time sources for the elapsed time report.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Source of the current time, as the distance from a fixed origin.
///
/// Only differences between two readings are used, so the origin does not
/// matter as long as it never moves.
pub trait TimeSource {
    fn now(&self) -> Duration;
}

impl<T: TimeSource + ?Sized> TimeSource for Box<T> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Monotonic, millisecond resolution (or better).  The default.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Wall clock time since the UNIX epoch.
///
/// Jumps with the system clock.  A clock set before the epoch reads as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl TimeSource for WallClock {
    fn now(&self) -> Duration {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
    }
}

/// Legacy whole-second resolution.
///
/// Every reading is truncated to the second, so reported times are
/// `seconds_elapsed * 1000`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Coarse<C>(pub C);

impl<C: TimeSource> TimeSource for Coarse<C> {
    fn now(&self) -> Duration {
        Duration::from_secs(self.0.now().as_secs())
    }
}

/// Milliseconds from `start` to `now`; never negative.
pub fn elapsed_ms(start: Duration, now: Duration) -> u64 {
    u64::try_from(now.saturating_sub(start).as_millis()).unwrap_or(u64::MAX)
}

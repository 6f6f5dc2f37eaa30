//! Wall-clock sources and fractional-second arithmetic

use std::sync::Mutex;

use chrono::{DateTime, TimeDelta, Utc};

use super::Seconds;

/// A source of "now". Every timer operation samples it exactly once.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to, for driving timers through virtual time
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a manual clock frozen at `start`
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(start) }
    }

    /// Create a manual clock frozen at the current wall-clock time
    pub fn starting_now() -> Self {
        Self::new(Utc::now())
    }

    /// Move the clock forward by `seconds`
    pub fn advance(&self, seconds: Seconds) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(next) = offset(*now, seconds) {
            *now = next;
        }
    }

    /// Jump the clock to an exact instant
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Fractional seconds from `earlier` to `later` (negative if `later` is before `earlier`)
pub fn seconds_between(later: DateTime<Utc>, earlier: DateTime<Utc>) -> Seconds {
    let delta = later - earlier;
    match delta.num_microseconds() {
        Some(micros) => micros as Seconds / 1_000_000.0,
        None => delta.num_milliseconds() as Seconds / 1_000.0,
    }
}

/// Shift `instant` by fractional seconds, or `None` when the result is not
/// a representable timestamp (including non-finite offsets)
pub fn offset(instant: DateTime<Utc>, seconds: Seconds) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let micros = (seconds * 1_000_000.0).round();
    if micros.abs() >= i64::MAX as Seconds {
        return None;
    }
    instant.checked_add_signed(TimeDelta::microseconds(micros as i64))
}

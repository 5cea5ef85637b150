//! Wall-clock abstraction.
//!
//! The engine never reads the system time directly; it takes a [`Clock`] so
//! tests can drive polling deterministically.

use chrono::Timelike;

use crate::core::types::MinuteOfDay;

/// Source of the current minute of day.
pub trait Clock: Send + Sync {
    /// Current minute of the local day, in `[0, 1439]`.
    fn now_minute(&self) -> MinuteOfDay;
}

/// Clock backed by the local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_minute(&self) -> MinuteOfDay {
        let now = chrono::Local::now();
        // chrono guarantees hour < 24 and minute < 60.
        MinuteOfDay::from_hm(now.hour() as u16, now.minute() as u16)
            .expect("local wall clock yields a valid minute of day")
    }
}

//! Core time types for the reminder engine.
//!
//! The engine works at whole-minute resolution: every schedule resolves to a
//! minute-of-day, and every poll compares the current minute against it.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of minutes in a day; valid minutes are `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u16 = 1440;

/// A minute-of-day value was outside `[0, 1439]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("minute of day out of range: {0}")]
pub struct InvalidMinute(pub u16);

/// A validated minute of the day, counted from local midnight.
///
/// Always in `[0, 1439]`; construction outside that range fails, so any
/// `MinuteOfDay` held by an entry or the engine is valid by type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    /// Create a minute-of-day from a raw minute count.
    pub fn new(minute: u16) -> Result<Self, InvalidMinute> {
        if minute < MINUTES_PER_DAY {
            Ok(Self(minute))
        } else {
            Err(InvalidMinute(minute))
        }
    }

    /// Create a minute-of-day from an hour and minute pair.
    pub fn from_hm(hour: u16, minute: u16) -> Result<Self, InvalidMinute> {
        if hour > 23 || minute > 59 {
            return Err(InvalidMinute(hour * 60 + minute));
        }
        Ok(Self(hour * 60 + minute))
    }

    /// Get the raw minute count.
    pub fn get(&self) -> u16 {
        self.0
    }

    /// Hour component (0-23).
    pub fn hour(&self) -> u16 {
        self.0 / 60
    }

    /// Minute component (0-59).
    pub fn minute(&self) -> u16 {
        self.0 % 60
    }
}

impl TryFrom<u16> for MinuteOfDay {
    type Error = InvalidMinute;

    fn try_from(minute: u16) -> Result<Self, Self::Error> {
        Self::new(minute)
    }
}

impl From<MinuteOfDay> for u16 {
    fn from(m: MinuteOfDay) -> u16 {
        m.0
    }
}

impl fmt::Display for MinuteOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

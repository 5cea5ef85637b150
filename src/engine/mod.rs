//! Reminder engine: poll logic plus the scheduling driver.
//!
//! This module provides the per-minute trigger/dedup state machine and the
//! cadence loop that runs it for the lifetime of a session.

mod driver;
mod poller;

pub use driver::{
    DriverError, DriverHandle, DriverState, ReminderDriver, DEFAULT_CADENCE, DEFAULT_WARMUP,
};
pub use poller::{ReminderEngine, TriggerEvent};

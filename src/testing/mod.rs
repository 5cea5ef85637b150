//! Testing utilities for users of the dosette library.
//!
//! - [`ManualClock`]: a settable clock for driving polls deterministically
//! - [`RecordingSink`]: captures delivered messages for assertions
//! - [`FailingSink`]: always fails delivery
//! - [`FailingStore`]: always fails reads, for exercising tick resilience

use async_trait::async_trait;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Mutex;

use crate::alert::{AlertSink, SinkError};
use crate::clock::Clock;
use crate::core::entry::ScheduleEntry;
use crate::core::types::MinuteOfDay;
use crate::store::{ScheduleStore, StoreError};

/// A clock whose minute is set by the test.
#[derive(Debug)]
pub struct ManualClock {
    minute: AtomicU16,
}

impl ManualClock {
    /// Create a clock reading the given minute.
    pub fn new(minute: MinuteOfDay) -> Self {
        Self {
            minute: AtomicU16::new(minute.get()),
        }
    }

    /// Move the clock to a new minute.
    pub fn set(&self, minute: MinuteOfDay) {
        self.minute.store(minute.get(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_minute(&self) -> MinuteOfDay {
        // Stored values always come from a validated MinuteOfDay.
        MinuteOfDay::new(self.minute.load(Ordering::SeqCst))
            .expect("manual clock holds a valid minute")
    }
}

/// A sink that records every delivered message.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    async fn notify(&self, message: &str) -> Result<(), SinkError> {
        self.messages.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

/// A sink whose delivery always fails.
#[derive(Debug, Default)]
pub struct FailingSink;

#[async_trait]
impl AlertSink for FailingSink {
    async fn notify(&self, _message: &str) -> Result<(), SinkError> {
        Err(SinkError::Spawn {
            program: "failing-sink".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "delivery refused"),
        })
    }
}

/// A store whose every operation fails.
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl ScheduleStore for FailingStore {
    async fn list(&self) -> Result<Vec<ScheduleEntry>, StoreError> {
        Err(StoreError::Malformed("store unavailable".to_string()))
    }

    async fn append(&self, _entry: ScheduleEntry) -> Result<(), StoreError> {
        Err(StoreError::Malformed("store unavailable".to_string()))
    }

    async fn remove_at(&self, _index: usize) -> Result<ScheduleEntry, StoreError> {
        Err(StoreError::Malformed("store unavailable".to_string()))
    }
}

pub mod alert;
pub mod auth;
pub mod clock;
pub mod core;
pub mod engine;
pub mod store;
pub mod testing;

pub use crate::alert::{AlertSink, ConsoleSink, DesktopSink, SinkError, SpeechSink};
pub use crate::auth::{AuthError, UserStore};
pub use crate::clock::{Clock, SystemClock};
pub use crate::core::entry::{EntryError, ScheduleEntry};
pub use crate::core::timeparse::{parse_time_of_day, TimeParseError};
pub use crate::core::types::{InvalidMinute, MinuteOfDay, MINUTES_PER_DAY};
pub use crate::engine::{
    DriverError, DriverHandle, DriverState, ReminderDriver, ReminderEngine, TriggerEvent,
    DEFAULT_CADENCE, DEFAULT_WARMUP,
};
pub use crate::store::{CsvStore, MemoryStore, ScheduleStore, StoreError};

//! Reminder poll logic and per-minute dedup state.
//!
//! [`ReminderEngine`] is the core state machine: each poll compares the
//! current minute against every entry's trigger minute and fires at most one
//! trigger event per distinct minute. The state is a single remembered
//! minute, so re-arming happens implicitly when the clock moves on.

use crate::core::entry::ScheduleEntry;
use crate::core::types::MinuteOfDay;

/// One batch of fired reminders. Ephemeral; consumed by the alert sink and
/// discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEvent {
    /// The wall-clock minute at which the matches were found.
    pub minute: MinuteOfDay,
    /// Names of the matched entries, in store order.
    pub matched: Vec<String>,
}

impl TriggerEvent {
    /// The combined human-readable message for this batch.
    ///
    /// All matched names go into one message, never one alert per entry.
    pub fn message(&self) -> String {
        format!("It's time to take {}", self.matched.join(" & "))
    }
}

/// Per-session reminder state.
///
/// `last_fired` lives only as long as the process: on restart it resets to
/// `None`, so a schedule that matches the exact startup minute can fire once
/// more across the restart boundary. That is accepted behavior, not state to
/// persist away.
#[derive(Debug, Default)]
pub struct ReminderEngine {
    last_fired: Option<MinuteOfDay>,
}

impl ReminderEngine {
    /// Create an engine with no fired minute recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent minute for which a batch was emitted, if any.
    pub fn last_fired(&self) -> Option<MinuteOfDay> {
        self.last_fired
    }

    /// Automatic poll, invoked once per scheduling tick.
    ///
    /// Returns a trigger event when at least one entry matches `now` and no
    /// batch has been emitted for this minute yet. Repeated ticks within the
    /// same minute are suppressed; an empty match leaves the dedup state
    /// untouched.
    pub fn poll(&mut self, now: MinuteOfDay, entries: &[ScheduleEntry]) -> Option<TriggerEvent> {
        self.poll_inner(now, entries, false)
    }

    /// Forced poll for an explicit "check now" action.
    ///
    /// Bypasses the dedup guard so current matches are always re-announced,
    /// but still records the minute so a following automatic tick in the
    /// same minute stays quiet.
    pub fn poll_forced(
        &mut self,
        now: MinuteOfDay,
        entries: &[ScheduleEntry],
    ) -> Option<TriggerEvent> {
        self.poll_inner(now, entries, true)
    }

    fn poll_inner(
        &mut self,
        now: MinuteOfDay,
        entries: &[ScheduleEntry],
        forced: bool,
    ) -> Option<TriggerEvent> {
        let matched: Vec<String> = entries
            .iter()
            .filter(|e| e.trigger_minute() == now)
            .map(|e| e.name().to_string())
            .collect();

        if matched.is_empty() {
            return None;
        }
        if !forced && self.last_fired == Some(now) {
            return None;
        }

        self.last_fired = Some(now);
        Some(TriggerEvent { minute: now, matched })
    }
}

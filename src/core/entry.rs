//! Schedule entries: one scheduled medication each.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::MinuteOfDay;

/// Errors that can occur when building a schedule entry.
#[derive(Debug, Error)]
pub enum EntryError {
    /// The medication name was empty or whitespace.
    #[error("medication name must not be empty")]
    EmptyName,
}

/// One scheduled medication.
///
/// Entries are read-only after creation; an edit is modeled as delete plus
/// recreate. Names are display labels, not unique keys, so duplicates are
/// allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Display name of the medication.
    name: String,
    /// Free-text dosage, may be empty (e.g., "500 mg").
    dosage: String,
    /// Free-text frequency, informational only (e.g., "Once daily").
    frequency: String,
    /// Minute of day at which the reminder fires.
    trigger_minute: MinuteOfDay,
}

impl ScheduleEntry {
    /// Create a new entry.
    ///
    /// The trigger minute must already be normalized; free-form time text is
    /// parsed by [`crate::core::timeparse::parse_time_of_day`] before an entry
    /// exists, so unparseable input is never stored.
    pub fn new(
        name: impl Into<String>,
        dosage: impl Into<String>,
        frequency: impl Into<String>,
        trigger_minute: MinuteOfDay,
    ) -> Result<Self, EntryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EntryError::EmptyName);
        }
        Ok(Self {
            name,
            dosage: dosage.into(),
            frequency: frequency.into(),
            trigger_minute,
        })
    }

    /// Display name of the medication.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dosage text.
    pub fn dosage(&self) -> &str {
        &self.dosage
    }

    /// Frequency text.
    pub fn frequency(&self) -> &str {
        &self.frequency
    }

    /// Minute of day at which this entry fires.
    pub fn trigger_minute(&self) -> MinuteOfDay {
        self.trigger_minute
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minute(m: u16) -> MinuteOfDay {
        MinuteOfDay::new(m).unwrap()
    }

    #[test]
    fn test_entry_creation() {
        let entry = ScheduleEntry::new("Aspirin", "500 mg", "Once daily", minute(540)).unwrap();
        assert_eq!(entry.name(), "Aspirin");
        assert_eq!(entry.dosage(), "500 mg");
        assert_eq!(entry.frequency(), "Once daily");
        assert_eq!(entry.trigger_minute().get(), 540);
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(ScheduleEntry::new("", "", "", minute(0)).is_err());
        assert!(ScheduleEntry::new("   ", "", "", minute(0)).is_err());
    }

    #[test]
    fn test_empty_dosage_and_frequency_allowed() {
        let entry = ScheduleEntry::new("Iron", "", "", minute(480)).unwrap();
        assert_eq!(entry.dosage(), "");
        assert_eq!(entry.frequency(), "");
    }

    #[test]
    fn test_duplicate_names_allowed() {
        let a = ScheduleEntry::new("Vitamin D", "", "", minute(480)).unwrap();
        let b = ScheduleEntry::new("Vitamin D", "", "", minute(600)).unwrap();
        assert_eq!(a.name(), b.name());
    }
}

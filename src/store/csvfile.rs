//! CSV-file store implementation.
//!
//! Persists one user's schedule as a line-oriented CSV file with the header
//! `Medication,Dosage,Frequency,Time`. Times are stored in canonical `HH:MM`
//! form; a row whose time no longer parses is skipped with a warning rather
//! than aborting the read. Survives process restart, nothing stronger.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use super::{ScheduleStore, StoreError};
use crate::core::entry::ScheduleEntry;
use crate::core::timeparse::parse_time_of_day;

/// On-disk row shape, one row per scheduled medication.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Record {
    #[serde(rename = "Medication")]
    medication: String,
    #[serde(rename = "Dosage")]
    dosage: String,
    #[serde(rename = "Frequency")]
    frequency: String,
    #[serde(rename = "Time")]
    time: String,
}

impl From<&ScheduleEntry> for Record {
    fn from(entry: &ScheduleEntry) -> Self {
        Self {
            medication: entry.name().to_string(),
            dosage: entry.dosage().to_string(),
            frequency: entry.frequency().to_string(),
            time: entry.trigger_minute().to_string(),
        }
    }
}

/// Convert a raw record into an entry, or skip it if it cannot be resolved.
fn to_entry(record: &Record) -> Option<ScheduleEntry> {
    let minute = match parse_time_of_day(&record.time) {
        Ok(minute) => minute,
        Err(e) => {
            tracing::warn!(
                medication = %record.medication,
                time = %record.time,
                error = %e,
                "Skipping stored entry with unreadable time"
            );
            return None;
        }
    };
    match ScheduleEntry::new(
        record.medication.clone(),
        record.dosage.clone(),
        record.frequency.clone(),
        minute,
    ) {
        Ok(entry) => Some(entry),
        Err(e) => {
            tracing::warn!(error = %e, "Skipping stored entry with invalid fields");
            None
        }
    }
}

fn csv_error(err: csv::Error) -> StoreError {
    if err.is_io_error() {
        match err.into_kind() {
            csv::ErrorKind::Io(e) => StoreError::Io(e),
            _ => StoreError::Malformed("unknown csv io error".to_string()),
        }
    } else {
        StoreError::Malformed(err.to_string())
    }
}

/// CSV-file-backed schedule store.
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    /// Open a store at the given path, creating an empty file with the
    /// header row if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if !path.exists() {
            let mut writer = csv::Writer::from_path(&path).map_err(csv_error)?;
            writer
                .write_record(["Medication", "Dosage", "Frequency", "Time"])
                .map_err(csv_error)?;
            writer.flush()?;
        }
        Ok(Self { path })
    }

    /// Open the per-user store file (`meds_<username>.csv`) under `data_dir`.
    pub fn for_user(data_dir: impl AsRef<Path>, username: &str) -> Result<Self, StoreError> {
        Self::open(data_dir.as_ref().join(format!("meds_{}.csv", username)))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_records(&self) -> Result<Vec<Record>, StoreError> {
        let mut reader = csv::Reader::from_path(&self.path).map_err(csv_error)?;
        let mut records = Vec::new();
        for result in reader.deserialize() {
            records.push(result.map_err(csv_error)?);
        }
        Ok(records)
    }

    fn write_records(&self, records: &[Record]) -> Result<(), StoreError> {
        let mut writer = csv::Writer::from_path(&self.path).map_err(csv_error)?;
        for record in records {
            writer.serialize(record).map_err(csv_error)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[async_trait]
impl ScheduleStore for CsvStore {
    async fn list(&self) -> Result<Vec<ScheduleEntry>, StoreError> {
        let records = self.read_records()?;
        Ok(records.iter().filter_map(to_entry).collect())
    }

    async fn append(&self, entry: ScheduleEntry) -> Result<(), StoreError> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(Record::from(&entry)).map_err(csv_error)?;
        writer.flush()?;
        Ok(())
    }

    async fn remove_at(&self, index: usize) -> Result<ScheduleEntry, StoreError> {
        let mut records = self.read_records()?;

        // Index positions refer to the readable entries as returned by
        // `list`; unreadable rows are passed over but left in the file.
        let mut readable = 0usize;
        let mut target = None;
        for (pos, record) in records.iter().enumerate() {
            if let Some(entry) = to_entry(record) {
                if readable == index {
                    target = Some((pos, entry));
                    break;
                }
                readable += 1;
            }
        }

        let (pos, entry) = target.ok_or(StoreError::IndexOutOfRange(index))?;
        records.remove(pos);
        self.write_records(&records)?;
        Ok(entry)
    }
}

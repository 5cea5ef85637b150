//! In-memory store implementation.
//!
//! Thread-safe backend for testing and development. Data is not persisted
//! across restarts.

use async_trait::async_trait;
use std::sync::RwLock;

use super::{ScheduleStore, StoreError};
use crate::core::entry::ScheduleEntry;

/// In-memory schedule store.
pub struct MemoryStore {
    entries: RwLock<Vec<ScheduleEntry>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Create a store pre-populated with entries.
    pub fn with_entries(entries: Vec<ScheduleEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn list(&self) -> Result<Vec<ScheduleEntry>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.clone())
    }

    async fn append(&self, entry: ScheduleEntry) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        entries.push(entry);
        Ok(())
    }

    async fn remove_at(&self, index: usize) -> Result<ScheduleEntry, StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        if index >= entries.len() {
            return Err(StoreError::IndexOutOfRange(index));
        }
        Ok(entries.remove(index))
    }
}

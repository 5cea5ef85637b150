//! Schedule storage abstraction.
//!
//! This module provides a trait-based store for schedule entries with
//! pluggable backends (in-memory, CSV file). The engine only ever reads;
//! entry creation and removal are driven by the user-facing layer.

mod csvfile;
mod memory;

pub use csvfile::CsvStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::entry::ScheduleEntry;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No entry exists at the given index.
    #[error("no entry at index {0}")]
    IndexOutOfRange(usize),

    /// Store lock was poisoned.
    #[error("store lock poisoned")]
    LockPoisoned,

    /// Underlying I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be read or written.
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Store of schedule entries for one user.
///
/// Entries keep insertion order; `list` returns them in that order and
/// `remove_at` addresses them by position, matching how a user picks a row
/// from a displayed list.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// List all entries in insertion order.
    async fn list(&self) -> Result<Vec<ScheduleEntry>, StoreError>;

    /// Append an entry.
    async fn append(&self, entry: ScheduleEntry) -> Result<(), StoreError>;

    /// Remove and return the entry at `index`.
    async fn remove_at(&self, index: usize) -> Result<ScheduleEntry, StoreError>;
}

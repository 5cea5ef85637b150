//! Core domain types: schedule entries and time normalization.

pub mod entry;
pub mod timeparse;
pub mod types;

//! Cache module for storing fetched prayer times to disk
//!
//! This module provides a cache manager that persists one JSON file per
//! (city, date) pair. Validity is keyed on calendar-date equality rather
//! than elapsed time: an entry for any other date reads as absent. Writes
//! are atomic (temp file then rename) so a concurrent reader never observes
//! a partially written entry.

mod manager;

pub use manager::{CacheManager, StorageError};

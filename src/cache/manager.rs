//! Cache manager for persisting fetched prayer times to disk
//!
//! Stores one JSON file per (city, date) key in an XDG-compliant cache
//! directory. A cached entry is valid only for its own calendar date, so
//! yesterday's file is never served for today; stale files are pruned
//! opportunistically on write.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Days, NaiveDate, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::data::{PrayerTimeSet, PrayerTimes};

/// Environment variable overriding the cache directory, used by tests
pub const CACHE_DIR_ENV: &str = "SALATY_CACHE_DIR";

/// Entries dated more than this many days before a written entry are pruned
const PRUNE_AFTER_DAYS: u64 = 7;

/// Wrapper struct for cached data stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    /// City the entry belongs to
    city_id: String,
    /// Calendar date the times apply to
    date: NaiveDate,
    /// When the data was fetched from the source
    fetched_at: DateTime<Utc>,
    /// The six time markers
    times: PrayerTimes,
}

/// Errors that can occur when persisting a cache entry.
///
/// Read failures are deliberately not represented: an unreadable or corrupt
/// entry is reported as absent so a bad cache can never fail a lookup.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed
    #[error("cache write failed: {0}")]
    Io(#[from] std::io::Error),

    /// Entry could not be serialized
    #[error("cache entry could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Manages reading and writing cached prayer times on disk
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a new CacheManager using the XDG-compliant cache directory
    /// (`~/.cache/salaty/times/` on Linux), honoring the `SALATY_CACHE_DIR`
    /// environment variable when set.
    ///
    /// Returns `None` if no cache directory can be determined (e.g., no home
    /// directory).
    pub fn new() -> Option<Self> {
        if let Ok(dir) = std::env::var(CACHE_DIR_ENV) {
            return Some(Self {
                cache_dir: PathBuf::from(dir),
            });
        }
        let project_dirs = ProjectDirs::from("", "", "salaty")?;
        let cache_dir = project_dirs.cache_dir().join("times");
        Some(Self { cache_dir })
    }

    /// Creates a new CacheManager with a custom cache directory
    ///
    /// Useful for testing or when a specific cache location is needed.
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Returns the path to the cache file for a (city, date) key
    fn entry_path(&self, city_id: &str, date: NaiveDate) -> PathBuf {
        self.cache_dir
            .join(format!("{}_{}.json", city_id, date.format("%Y-%m-%d")))
    }

    /// Reads the cached prayer times for a city on a specific date.
    ///
    /// Returns `None` when the entry does not exist, cannot be parsed, or
    /// carries a different (city, date) pair than requested. Storage
    /// problems never surface as errors from this method.
    pub fn read(&self, city_id: &str, date: NaiveDate) -> Option<PrayerTimeSet> {
        let path = self.entry_path(city_id, date);
        let content = fs::read_to_string(path).ok()?;
        let entry: CacheEntry = serde_json::from_str(&content).ok()?;

        // Same-day cache: the stored date must equal the requested one.
        if entry.date != date || entry.city_id != city_id {
            return None;
        }

        Some(PrayerTimeSet {
            city_id: entry.city_id,
            date: entry.date,
            times: entry.times,
        })
    }

    /// Writes a prayer time set to the cache, overwriting any existing entry
    /// for the same (city, date) key.
    ///
    /// The entry is written to a temporary file in the cache directory and
    /// renamed into place, so concurrent readers never see a partial entry.
    /// Entries dated more than a week before `set.date` are pruned
    /// afterwards on a best-effort basis.
    pub fn write(&self, set: &PrayerTimeSet) -> Result<(), StorageError> {
        fs::create_dir_all(&self.cache_dir)?;

        let entry = CacheEntry {
            city_id: set.city_id.clone(),
            date: set.date,
            fetched_at: Utc::now(),
            times: set.times.clone(),
        };
        let json = serde_json::to_string_pretty(&entry)?;

        let path = self.entry_path(&set.city_id, set.date);
        let tmp_path = path.with_extension(format!("tmp.{}", std::process::id()));
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &path)?;

        self.prune(set.date);
        Ok(())
    }

    /// Removes entries dated more than [`PRUNE_AFTER_DAYS`] days before
    /// `written`. Pruning is an optimization, not a correctness requirement,
    /// so every failure here is ignored.
    fn prune(&self, written: NaiveDate) {
        let Some(cutoff) = written.checked_sub_days(Days::new(PRUNE_AFTER_DAYS)) else {
            return;
        };
        let Ok(entries) = fs::read_dir(&self.cache_dir) else {
            return;
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(date) = entry_date(&name.to_string_lossy()) else {
                continue;
            };
            if date < cutoff {
                debug!(file = %name.to_string_lossy(), "pruning stale cache entry");
                let _ = fs::remove_file(entry.path());
            }
        }
    }
}

/// Extracts the date component from a `{city}_{YYYY-MM-DD}.json` file name
fn entry_date(file_name: &str) -> Option<NaiveDate> {
    let stem = file_name.strip_suffix(".json")?;
    let (_, date) = stem.rsplit_once('_')?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

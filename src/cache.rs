//! File-backed monitor cache with a short TTL.
//!
//! brightctl runs once per user action (typically per keypress), so there is
//! no long-lived process to hold the monitor list in memory. The last
//! detection pass is instead persisted to a per-user file in the temp
//! directory and served back while fresh.
//!
//! The cache is advisory, best-effort shared state. Independent invocations
//! may read and write it concurrently without locking: a torn or corrupt read
//! parses as garbage and degrades to a miss, and the last completed write
//! wins. Nothing in this module ever raises — a caching fault must never be
//! the reason a brightness operation fails.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::DEFAULT_CACHE_DURATION_SECS;
use crate::monitor::Monitor;
use crate::utils::current_user;

/// On-disk snapshot: creation time plus the sorted monitor list.
#[derive(Serialize, Deserialize)]
struct CacheRecord {
    timestamp: i64,
    monitors: Vec<Monitor>,
}

/// Caches the sorted list of detected monitors with a TTL.
pub struct MonitorCache {
    path: PathBuf,
    cache_duration: Duration,
}

impl MonitorCache {
    /// Cache at the default per-user path with the given TTL.
    pub fn new(cache_duration: Duration) -> Self {
        Self::at_path(default_cache_path(), cache_duration)
    }

    /// Cache at an explicit path (tests point this at a tempdir).
    pub fn at_path(path: PathBuf, cache_duration: Duration) -> Self {
        Self {
            path,
            cache_duration,
        }
    }

    /// Return the cached monitor list, or None if stale or missing.
    ///
    /// Every failure mode reads as a miss: absent file, unreadable file,
    /// malformed JSON, and an expired timestamp all yield None. Freshness is
    /// evaluated on every call, never cached.
    pub fn get(&self) -> Option<Vec<Monitor>> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        let record: CacheRecord = serde_json::from_str(&raw).ok()?;

        let age = Utc::now().timestamp().saturating_sub(record.timestamp);
        if age > self.cache_duration.as_secs() as i64 {
            return None;
        }

        Some(record.monitors)
    }

    /// Persist the sorted monitor list, overwriting any prior snapshot.
    ///
    /// A write failure is a warning, not an error: the caller's brightness
    /// operation has already succeeded and must stay successful.
    pub fn set(&self, monitors: &[Monitor]) {
        let record = CacheRecord {
            timestamp: Utc::now().timestamp(),
            monitors: monitors.to_vec(),
        };

        let json = match serde_json::to_string_pretty(&record) {
            Ok(json) => json,
            Err(e) => {
                log_warning!("Failed to serialize monitor cache: {e}");
                return;
            }
        };

        if let Err(e) = std::fs::write(&self.path, json) {
            log_warning!("Failed to write cache: {e}");
        }
    }

    /// Delete the cache file. Absence and removal failures are ignored.
    pub fn invalidate(&self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

impl Default for MonitorCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_CACHE_DURATION_SECS))
    }
}

/// Per-user cache location in the system temp directory.
fn default_cache_path() -> PathBuf {
    std::env::temp_dir().join(format!("brightctl-{}-bus-cache.json", current_user()))
}

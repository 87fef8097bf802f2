//! File-backed JSON cache: one document per key inside a per-widget directory.

use chrono::{DateTime, Local};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CacheError;

/// A cached payload with its fetch and access timestamps.
///
/// `updated_time` only moves when the payload is fetched again; merely
/// re-validating a record bumps `accessed_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheRecord<T> {
    #[serde(flatten)]
    pub payload: T,
    pub updated_time: DateTime<Local>,
    pub accessed_time: DateTime<Local>,
}

impl<T> CacheRecord<T> {
    /// A record for a payload fetched at `updated_time`, written at `now`.
    pub fn new(payload: T, updated_time: DateTime<Local>, now: DateTime<Local>) -> Self {
        Self {
            payload,
            updated_time,
            accessed_time: now,
        }
    }

    /// Age of the payload in fractional hours.
    pub fn age_hours(&self, now: DateTime<Local>) -> f64 {
        (now - self.updated_time).num_milliseconds() as f64 / 3_600_000.0
    }

    /// Mark the record as checked without touching the payload.
    pub fn touch(&mut self, now: DateTime<Local>) {
        self.accessed_time = now;
    }
}

/// JSON documents stored under `<root>/<namespace>/<key>`.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(root: &Path, namespace: &str) -> Self {
        Self {
            dir: root.join(namespace),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Read a cached document.
    ///
    /// Returns `None` when the file does not exist. A file that cannot be read
    /// or parsed is also treated as absent so the next fetch overwrites it.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        if !path.exists() {
            tracing::debug!("No cache file at {}", path.display());
            return None;
        }

        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Failed to read cache file {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring unreadable cache file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Write a document, creating the cache directory on first use.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir).map_err(|source| CacheError::CreateDir {
                path: self.dir.clone(),
                source,
            })?;
        }

        let path = self.path_for(key);
        let contents = serde_json::to_string(value)?;
        std::fs::write(&path, contents).map_err(|source| CacheError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("Wrote cache file {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Payload {
        my_value: u32,
        label: String,
    }

    fn at(hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 5, 14, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path(), "pollen-level");
        let record = CacheRecord::new(
            Payload { my_value: 3, label: "Low".into() },
            at(9, 0),
            at(9, 30),
        );

        store.save("hourly-data.json", &record).unwrap();
        let loaded: CacheRecord<Payload> = store.load("hourly-data.json").unwrap();

        assert_eq!(loaded, record);
    }

    #[test]
    fn test_load_missing_key_is_none() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path(), "pollen-level");
        assert!(store.load::<CacheRecord<Payload>>("never-written.json").is_none());
        assert!(!store.dir().exists());
    }

    #[test]
    fn test_directory_created_lazily() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path(), "tesco-mobile");
        assert!(!store.dir().exists());
        store.save("usage-data.json", &1u8).unwrap();
        assert!(store.dir().is_dir());
    }

    #[test]
    fn test_corrupt_file_is_treated_as_absent() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path(), "pollen-level");
        std::fs::create_dir_all(store.dir()).unwrap();
        std::fs::write(store.path_for("hourly-data.json"), "{ not json").unwrap();
        assert!(store.load::<CacheRecord<Payload>>("hourly-data.json").is_none());
    }

    #[test]
    fn test_record_layout_is_flat_camel_case() {
        let record = CacheRecord::new(
            Payload { my_value: 1, label: "x".into() },
            at(8, 0),
            at(8, 0),
        );
        let json: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert!(json.get("myValue").is_some());
        assert!(json.get("updatedTime").is_some());
        assert!(json.get("accessedTime").is_some());
        assert!(json.get("payload").is_none());
    }

    #[test]
    fn test_age_and_touch() {
        let mut record = CacheRecord::new(0u8, at(8, 0), at(8, 0));
        assert!((record.age_hours(at(9, 30)) - 1.5).abs() < 1e-9);

        record.touch(at(9, 30));
        assert_eq!(record.updated_time, at(8, 0));
        assert_eq!(record.accessed_time, at(9, 30));
    }
}

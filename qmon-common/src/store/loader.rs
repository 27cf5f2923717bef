//! Cached store loader
//!
//! `load` never fails. A missing store degrades to its empty default; an
//! unreadable or unparsable store is logged and treated the same way. The
//! files may be rewritten at any time by external writers, so the loader
//! simply re-reads once the cache entry expires.

use super::{StoreCache, StoreName, StoreSnapshot};
use crate::error::StoreError;
use crate::time::Clock;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct StoreLoader {
    data_dir: PathBuf,
    cache: StoreCache,
}

impl StoreLoader {
    pub fn new(data_dir: impl Into<PathBuf>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            data_dir: data_dir.into(),
            cache: StoreCache::new(ttl, clock),
        }
    }

    /// Snapshot of `store`, from cache when fresh
    ///
    /// `present` is false when the file was missing or unusable at load time.
    pub fn load(&self, store: StoreName) -> StoreSnapshot {
        self.cache
            .get_or_load(store, || match read_store(&self.path_for(store)) {
                Ok(content) => (content, true),
                Err(StoreError::Unavailable(path)) => {
                    debug!("Store {} not present at {}", store.as_str(), path.display());
                    (store.empty_content(), false)
                }
                Err(e) => {
                    warn!("Store {} unusable, treating as empty: {}", store.as_str(), e);
                    (store.empty_content(), false)
                }
            })
    }

    pub fn path_for(&self, store: StoreName) -> PathBuf {
        self.data_dir.join(store.file_name())
    }
}

/// Read and parse one store file
pub fn read_store(path: &Path) -> Result<Value, StoreError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(StoreError::Unavailable(path.to_path_buf()))
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualClock;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use tempfile::TempDir;

    fn loader(dir: &TempDir) -> (StoreLoader, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 11, 10, 12, 0, 0).unwrap()));
        let loader = StoreLoader::new(dir.path(), Duration::from_secs(60), clock.clone());
        (loader, clock)
    }

    #[test]
    fn test_missing_store_yields_empty_default() {
        let dir = TempDir::new().unwrap();
        let (loader, _clock) = loader(&dir);

        let patterns = loader.load(StoreName::Patterns);
        assert!(!patterns.present);
        assert_eq!(*patterns.content, json!({"patterns": []}));
        assert_eq!(*loader.load(StoreName::ModelPerformance).content, json!({}));
    }

    #[test]
    fn test_corrupt_store_treated_as_absent() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("assessments.json"), "{ not json").unwrap();
        let (loader, _clock) = loader(&dir);

        assert!(matches!(
            read_store(&loader.path_for(StoreName::Assessments)),
            Err(StoreError::Corrupt { .. })
        ));
        let assessments = loader.load(StoreName::Assessments);
        assert!(!assessments.present);
        assert_eq!(*assessments.content, json!({"assessments": []}));
    }

    #[test]
    fn test_rewritten_file_seen_only_after_ttl() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quality_trends.json");
        std::fs::write(&path, r#"{"trends": [{"v": 1}]}"#).unwrap();
        let (loader, clock) = loader(&dir);

        assert_eq!(*loader.load(StoreName::Trends).content, json!({"trends": [{"v": 1}]}));

        std::fs::write(&path, r#"{"trends": [{"v": 2}]}"#).unwrap();
        clock.advance(chrono::Duration::seconds(30));
        assert_eq!(*loader.load(StoreName::Trends).content, json!({"trends": [{"v": 1}]}));

        clock.advance(chrono::Duration::seconds(31));
        assert_eq!(*loader.load(StoreName::Trends).content, json!({"trends": [{"v": 2}]}));
    }

    #[test]
    fn test_cached_value_survives_file_removal_within_ttl() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patterns.json");
        std::fs::write(&path, r#"{"patterns": [{"id": "p1"}]}"#).unwrap();
        let (loader, _clock) = loader(&dir);

        let first = loader.load(StoreName::Patterns);
        std::fs::remove_file(&path).unwrap();
        let second = loader.load(StoreName::Patterns);

        assert!(Arc::ptr_eq(&first.content, &second.content));
        assert!(second.present);
    }
}

//! Time-bounded cache of parsed store content
//!
//! One entry per store. Entries are replaced whole under the write lock, so
//! concurrent reloads of an expired key can race but never leave a partial
//! entry behind; the last complete load wins.

use super::{RawStoreContent, StoreName};
use crate::time::Clock;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::debug;

/// Store content as of one load
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub content: RawStoreContent,
    /// File existed and parsed when this snapshot was loaded
    pub present: bool,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    loaded_at: DateTime<Utc>,
    snapshot: StoreSnapshot,
}

pub struct StoreCache {
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<StoreName, CacheEntry>>,
}

impl StoreCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let ttl = chrono::Duration::from_std(ttl)
            .unwrap_or_else(|_| chrono::Duration::seconds(i64::from(u32::MAX)));
        Self {
            ttl,
            clock,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Cached snapshot for `store` if it was loaded less than TTL ago
    pub fn get_fresh(&self, store: StoreName) -> Option<StoreSnapshot> {
        let now = self.clock.now();
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(&store)
            .filter(|entry| self.is_fresh_at(entry, now))
            .map(|entry| entry.snapshot.clone())
    }

    /// Replace the entry for `store`, stamped with the current clock time
    pub fn insert(&self, store: StoreName, content: Value, present: bool) -> StoreSnapshot {
        let snapshot = StoreSnapshot {
            content: Arc::new(content),
            present,
        };
        let entry = CacheEntry {
            loaded_at: self.clock.now(),
            snapshot: snapshot.clone(),
        };
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(store, entry);
        snapshot
    }

    /// Fresh cached snapshot, or the result of `load` which is then cached
    ///
    /// `load` runs without holding the lock and returns the content plus
    /// whether the store was present.
    pub fn get_or_load<F>(&self, store: StoreName, load: F) -> StoreSnapshot
    where
        F: FnOnce() -> (Value, bool),
    {
        if let Some(snapshot) = self.get_fresh(store) {
            debug!("Cache hit for {}", store.as_str());
            return snapshot;
        }
        debug!("Cache miss for {}", store.as_str());
        let (content, present) = load();
        self.insert(store, content, present)
    }

    fn is_fresh_at(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        let age = now - entry.loaded_at;
        age >= chrono::Duration::zero() && age < self.ttl
    }
}

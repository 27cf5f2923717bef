//! JSON store access
//!
//! Six independently-written stores feed the dashboard. The loader reads
//! them through a per-instance TTL cache; nothing here writes to disk.

pub mod cache;
pub mod loader;

pub use cache::{StoreCache, StoreSnapshot};
pub use loader::StoreLoader;

use crate::record::Source;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Parsed store content as held by the cache
pub type RawStoreContent = Arc<Value>;

/// Known stores, in merge order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StoreName {
    QualityHistory,
    PerformanceRecords,
    Patterns,
    Assessments,
    Trends,
    ModelPerformance,
}

impl StoreName {
    /// All stores in the fixed order used when merging
    pub const ALL: [StoreName; 6] = [
        StoreName::QualityHistory,
        StoreName::PerformanceRecords,
        StoreName::Patterns,
        StoreName::Assessments,
        StoreName::Trends,
        StoreName::ModelPerformance,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::QualityHistory => "quality_history.json",
            Self::PerformanceRecords => "performance_records.json",
            Self::Patterns => "patterns.json",
            Self::Assessments => "assessments.json",
            Self::Trends => "quality_trends.json",
            Self::ModelPerformance => "model_performance.json",
        }
    }

    /// Provenance tag for records produced from this store
    pub fn source(self) -> Source {
        match self {
            Self::QualityHistory => Source::QualityHistory,
            Self::PerformanceRecords => Source::PerformanceRecords,
            Self::Patterns => Source::Patterns,
            Self::Assessments => Source::Assessments,
            Self::Trends => Source::Trends,
            Self::ModelPerformance => Source::ModelPerformance,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.source().as_str()
    }

    /// Key of the record list inside the wrapping object, if the store has one
    pub fn list_key(self) -> Option<&'static str> {
        match self {
            Self::QualityHistory => Some("quality_assessments"),
            Self::PerformanceRecords => Some("records"),
            Self::Patterns => Some("patterns"),
            Self::Assessments => Some("assessments"),
            Self::Trends => Some("trends"),
            Self::ModelPerformance => None,
        }
    }

    /// Empty structure substituted when the store is absent or corrupt
    pub fn empty_content(self) -> Value {
        let mut object = Map::new();
        if let Some(key) = self.list_key() {
            object.insert(key.to_string(), Value::Array(Vec::new()));
        }
        Value::Object(object)
    }
}

//! # QMON Common Library
//!
//! Analytics engine behind the QMON quality dashboard:
//! - Cached loading of the on-disk JSON stores
//! - Per-store record normalization and cross-store deduplication
//! - Trend, per-model, timeline and composite-index analytics
//! - The read-only query façade consumed by qmon-dash
//! - Configuration loading and clock utilities

pub mod analytics;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod normalize;
pub mod query;
pub mod record;
pub mod store;
pub mod time;

pub use error::{Error, Result};
pub use query::QueryFacade;
pub use record::{AssessmentRecord, Attribution, IdentityKey, Source};

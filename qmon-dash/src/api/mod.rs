//! HTTP API handlers for qmon-dash

pub mod health;
pub mod metrics;

pub use health::health_routes;
pub use metrics::metrics_routes;

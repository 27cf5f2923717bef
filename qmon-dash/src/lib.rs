//! qmon-dash library - quality dashboard HTTP surface
//!
//! Read-only JSON endpoints over the qmon-common query façade.

use axum::Router;
use qmon_common::QueryFacade;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

pub use error::ApiError;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Query façade over the on-disk stores (read-only)
    pub facade: Arc<QueryFacade>,
}

impl AppState {
    pub fn new(facade: QueryFacade) -> Self {
        Self {
            facade: Arc::new(facade),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::metrics_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

use std::sync::Arc;

use crate::db::JobStore;
use crate::matching::matcher::JobMatcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Job catalogue. Also used directly by the stats and diagnostics endpoints.
    pub store: Arc<dyn JobStore>,
    /// Search pipeline wired with the store, the relevance scorer and the
    /// result cap chosen at startup.
    pub matcher: JobMatcher,
}

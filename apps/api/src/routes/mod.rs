pub mod diagnostics;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;
use crate::stats::handlers::handle_stats;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Search
        .route(
            "/",
            get(handlers::handle_index).post(handlers::handle_search_form),
        )
        .route("/api/search", post(handlers::handle_api_search))
        // Catalogue insight
        .route("/api/stats", get(handle_stats))
        .route("/api/diagnostics", get(diagnostics::handle_diagnostics))
        .fallback(handlers::handle_not_found)
        .with_state(state)
}

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::state::AppState;

/// GET /api/diagnostics
///
/// Store reachability, server version, per-table row counts and a few sample jobs.
/// Read-only; opens one connection per call.
pub async fn handle_diagnostics(State(state): State<AppState>) -> Response {
    match state.store.diagnostics().await {
        Ok(diagnostics) => Json(json!({
            "status": "ok",
            "message": "Connection succeeded",
            "db_version": diagnostics.db_version,
            "counts": diagnostics.counts,
            "sample_jobs": diagnostics.sample_jobs,
            "checked_at": diagnostics.checked_at,
        }))
        .into_response(),
        Err(e) => {
            error!("Store diagnostics failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "message": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

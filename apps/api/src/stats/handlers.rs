use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::state::AppState;
use crate::stats::distribution::{compute_distribution, TaxonomyDistribution, TOP_SUBFAMILIES};

/// GET /api/stats
///
/// Job counts per family and for the most populated sub-families.
pub async fn handle_stats(
    State(state): State<AppState>,
) -> Result<Json<TaxonomyDistribution>, AppError> {
    let rows = state.store.fetch_taxonomy().await?;
    Ok(Json(compute_distribution(&rows, TOP_SUBFAMILIES)))
}

use axum::extract::{Path, State};

use crate::app::AppState;
use crate::database::models::Complex;
use crate::handlers::utils::parse_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::ComplexId;

/// GET /api/complexes - List every complex with its buildings
pub async fn complex_list(State(state): State<AppState>) -> ApiResult<Vec<Complex>> {
    let complexes = state.complexes.list().await?;
    Ok(ApiResponse::success(complexes))
}

/// GET /api/complexes/:complexId
pub async fn complex_get(
    State(state): State<AppState>,
    Path(complex_id): Path<String>,
) -> ApiResult<Complex> {
    let complex_id: ComplexId = parse_id(&complex_id, "complex")?;
    let complex = state.complexes.get(complex_id).await?;
    Ok(ApiResponse::success(complex))
}

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::app::AppState;
use crate::database::models::{Building, Complex, ComplexPatch, NewBuilding, NewComplex};
use crate::handlers::utils::{parse_id, FieldErrors};
use crate::middleware::{ApiResponse, ApiResult};
use crate::policy::Actor;
use crate::types::{BuildingId, ComplexId};

/// POST /api/complexes - Admin only
pub async fn complex_create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<NewComplex>, JsonRejection>,
) -> ApiResult<Complex> {
    let Json(data) = payload?;

    let mut errors = FieldErrors::new();
    errors.require("name", &data.name).require("address", &data.address);
    for (i, building) in data.buildings.iter().enumerate() {
        errors.require(&format!("buildings[{}].name", i), &building.name);
    }
    errors.into_result()?;

    let complex = state.complexes.create(&actor, data).await?;
    Ok(ApiResponse::created(complex))
}

/// PUT /api/complexes/:complexId - Partial update of name and/or address
pub async fn complex_update(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(complex_id): Path<String>,
    payload: Result<Json<ComplexPatch>, JsonRejection>,
) -> ApiResult<Complex> {
    let complex_id: ComplexId = parse_id(&complex_id, "complex")?;
    let Json(patch) = payload?;

    let mut errors = FieldErrors::new();
    errors
        .require_opt("name", patch.name.as_deref())
        .require_opt("address", patch.address.as_deref());
    errors.into_result()?;

    let complex = state.complexes.update(&actor, complex_id, patch).await?;
    Ok(ApiResponse::success(complex))
}

/// DELETE /api/complexes/:complexId - Admin only, returns the removed complex
pub async fn complex_delete(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(complex_id): Path<String>,
) -> ApiResult<Complex> {
    let complex_id: ComplexId = parse_id(&complex_id, "complex")?;
    let complex = state.complexes.delete(&actor, complex_id).await?;
    Ok(ApiResponse::success(complex))
}

/// POST /api/complexes/:complexId/buildings
pub async fn building_create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(complex_id): Path<String>,
    payload: Result<Json<NewBuilding>, JsonRejection>,
) -> ApiResult<Building> {
    let complex_id: ComplexId = parse_id(&complex_id, "complex")?;
    let Json(data) = payload?;

    let mut errors = FieldErrors::new();
    errors.require("name", &data.name);
    errors.into_result()?;

    let building = state.complexes.add_building(&actor, complex_id, data).await?;
    Ok(ApiResponse::created(building))
}

/// DELETE /api/complexes/:complexId/buildings/:buildingId
pub async fn building_delete(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((complex_id, building_id)): Path<(String, String)>,
) -> ApiResult<Building> {
    let complex_id: ComplexId = parse_id(&complex_id, "complex")?;
    let building_id: BuildingId = parse_id(&building_id, "building")?;
    let building = state
        .complexes
        .remove_building(&actor, complex_id, building_id)
        .await?;
    Ok(ApiResponse::success(building))
}

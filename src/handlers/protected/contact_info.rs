use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::app::AppState;
use crate::database::models::{ContactFields, ContactInfoRecord};
use crate::handlers::utils::parse_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::policy::Actor;
use crate::types::{BuildingId, ComplexId, ContactInfoId};

/// POST /api/complexes/:complexId/contact-info - Complex-level record
pub async fn contact_info_create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(complex_id): Path<String>,
    payload: Result<Json<ContactFields>, JsonRejection>,
) -> ApiResult<ContactInfoRecord> {
    let complex_id: ComplexId = parse_id(&complex_id, "complex")?;
    let Json(fields) = payload?;

    let record = state
        .contact_info
        .create(&actor, complex_id, None, fields)
        .await?;
    Ok(ApiResponse::created(record))
}

/// POST /api/complexes/:complexId/buildings/:buildingId/contact-info
///
/// A building that is not part of the complex yields a complex-level record.
pub async fn contact_info_create_for_building(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((complex_id, building_id)): Path<(String, String)>,
    payload: Result<Json<ContactFields>, JsonRejection>,
) -> ApiResult<ContactInfoRecord> {
    let complex_id: ComplexId = parse_id(&complex_id, "complex")?;
    let building_id: BuildingId = parse_id(&building_id, "building")?;
    let Json(fields) = payload?;

    let record = state
        .contact_info
        .create(&actor, complex_id, Some(building_id), fields)
        .await?;
    Ok(ApiResponse::created(record))
}

/// PUT /api/contact-info/:contactInfoId - Merge fields into the record
pub async fn contact_info_update(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(contact_info_id): Path<String>,
    payload: Result<Json<ContactFields>, JsonRejection>,
) -> ApiResult<ContactInfoRecord> {
    let id: ContactInfoId = parse_id(&contact_info_id, "contact info")?;
    let Json(fields) = payload?;

    let record = state.contact_info.update(&actor, id, fields).await?;
    Ok(ApiResponse::success(record))
}

/// DELETE /api/contact-info/:contactInfoId - Returns the removed record
pub async fn contact_info_delete(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(contact_info_id): Path<String>,
) -> ApiResult<ContactInfoRecord> {
    let id: ContactInfoId = parse_id(&contact_info_id, "contact info")?;
    let record = state.contact_info.delete(&actor, id).await?;
    Ok(ApiResponse::success(record))
}

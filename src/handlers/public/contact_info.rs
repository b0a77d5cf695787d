use axum::extract::{Path, State};

use crate::app::AppState;
use crate::database::models::ContactInfoRecord;
use crate::handlers::utils::parse_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::{ComplexId, ContactInfoId};

/// GET /api/complexes/:complexId/contact-info - Complex-level and building-level records
pub async fn contact_info_list(
    State(state): State<AppState>,
    Path(complex_id): Path<String>,
) -> ApiResult<Vec<ContactInfoRecord>> {
    let complex_id: ComplexId = parse_id(&complex_id, "complex")?;
    let records = state.contact_info.list_by_complex(complex_id).await?;
    Ok(ApiResponse::success(records))
}

/// GET /api/contact-info/:contactInfoId
pub async fn contact_info_get(
    State(state): State<AppState>,
    Path(contact_info_id): Path<String>,
) -> ApiResult<ContactInfoRecord> {
    let id: ContactInfoId = parse_id(&contact_info_id, "contact info")?;
    let record = state.contact_info.get(id).await?;
    Ok(ApiResponse::success(record))
}

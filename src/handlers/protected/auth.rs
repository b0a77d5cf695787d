use axum::Extension;

use crate::middleware::{ApiResponse, ApiResult};
use crate::policy::Actor;

/// GET /api/auth/whoami - The caller as the access policy sees it
pub async fn whoami(Extension(actor): Extension<Actor>) -> ApiResult<Actor> {
    Ok(ApiResponse::success(actor))
}

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};

use crate::app::AppState;
use crate::database::models::{NewUser, User};
use crate::handlers::utils::FieldErrors;
use crate::middleware::{ApiResponse, ApiResult};
use crate::policy::Actor;

/// POST /api/users - Admin only; memberships are given inline
pub async fn user_create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<User> {
    let Json(data) = payload?;

    let mut errors = FieldErrors::new();
    errors.require("name", &data.name);
    errors.into_result()?;

    let user = state.users.create(&actor, data).await?;
    Ok(ApiResponse::created(user))
}

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::Notification;
use crate::handlers::utils::{parse_id, FieldErrors};
use crate::middleware::{ApiResponse, ApiResult};
use crate::policy::Actor;
use crate::types::{ComplexId, NotificationId};

#[derive(Debug, Deserialize)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
}

/// POST /api/complexes/:complexId/notifications - Moderators and admins
pub async fn notification_create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(complex_id): Path<String>,
    payload: Result<Json<NotificationRequest>, JsonRejection>,
) -> ApiResult<Notification> {
    let complex_id: ComplexId = parse_id(&complex_id, "complex")?;
    let Json(request) = payload?;

    let mut errors = FieldErrors::new();
    errors.require("title", &request.title).require("body", &request.body);
    errors.into_result()?;

    let notification = state
        .notifications
        .create(&actor, complex_id, request.title, request.body)
        .await?;
    Ok(ApiResponse::created(notification))
}

/// GET /api/complexes/:complexId/notifications - Newest first, members only
pub async fn notification_list(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(complex_id): Path<String>,
) -> ApiResult<Vec<Notification>> {
    let complex_id: ComplexId = parse_id(&complex_id, "complex")?;
    let notifications = state.notifications.list(&actor, complex_id).await?;
    Ok(ApiResponse::success(notifications))
}

/// DELETE /api/notifications/:notificationId
pub async fn notification_delete(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(notification_id): Path<String>,
) -> ApiResult<Notification> {
    let id: NotificationId = parse_id(&notification_id, "notification")?;
    let notification = state.notifications.delete(&actor, id).await?;
    Ok(ApiResponse::success(notification))
}

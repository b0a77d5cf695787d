use axum::{extract::State, response::IntoResponse, Json};
use serde_json::{json, Value};
use tracing::error;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::ApiResponse;

/// GET / - Service description
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Complex API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Residential complex management backend",
            "endpoints": {
                "health": "/health (public)",
                "complexes": "/api/complexes[/:complexId] (public read, protected write)",
                "buildings": "/api/complexes/:complexId/buildings[/:buildingId] (protected)",
                "contact_info": "/api/complexes/:complexId/contact-info, /api/contact-info/:contactInfoId",
                "notifications": "/api/complexes/:complexId/notifications, /api/notifications/:notificationId (protected)",
                "auth": "/api/auth/whoami (protected)",
                "users": "/api/users (protected, admin)",
            }
        }
    }))
}

/// GET /health - Liveness plus a store round-trip
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let backend = state.store.backend_name();
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => ApiResponse::success(json!({
            "status": "ok",
            "backend": backend,
            "timestamp": now,
        }))
        .into_response(),
        Err(e) => {
            error!("Health check failed on {} store: {}", backend, e);
            ApiError::service_unavailable(format!("{} store unavailable", backend)).into_response()
        }
    }
}


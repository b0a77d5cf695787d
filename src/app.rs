use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Uri},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::{AppConfig, SecurityConfig};
use crate::database::store::Store;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::{ComplexService, ContactInfoService, NotificationService, UserService};

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub complexes: ComplexService,
    pub contact_info: ContactInfoService,
    pub notifications: NotificationService,
    pub users: UserService,
}

impl AppState {
    /// Wire every service onto one backing store
    pub fn from_store<S: Store + 'static>(config: Arc<AppConfig>, store: Arc<S>) -> Self {
        let complexes = ComplexService::new(store.clone());
        let contact_info = ContactInfoService::new(store.clone(), complexes.clone());
        let notifications = NotificationService::new(store.clone(), complexes.clone());
        let users = UserService::new(store.clone());

        Self {
            config,
            store,
            complexes,
            contact_info,
            notifications,
            users,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/api/complexes", get(public::complex_list))
        .route("/api/complexes/:complexId", get(public::complex_get))
        .route("/api/complexes/:complexId/contact-info", get(public::contact_info_list))
        .route("/api/contact-info/:contactInfoId", get(public::contact_info_get))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Complexes and buildings
        .route("/api/complexes", post(protected::complex_create))
        .route(
            "/api/complexes/:complexId",
            put(protected::complex_update).delete(protected::complex_delete),
        )
        .route("/api/complexes/:complexId/buildings", post(protected::building_create))
        .route(
            "/api/complexes/:complexId/buildings/:buildingId",
            delete(protected::building_delete),
        )
        // Contact info
        .route("/api/complexes/:complexId/contact-info", post(protected::contact_info_create))
        .route(
            "/api/complexes/:complexId/buildings/:buildingId/contact-info",
            post(protected::contact_info_create_for_building),
        )
        .route(
            "/api/contact-info/:contactInfoId",
            put(protected::contact_info_update).delete(protected::contact_info_delete),
        )
        // Notifications
        .route(
            "/api/complexes/:complexId/notifications",
            post(protected::notification_create).get(protected::notification_list),
        )
        .route("/api/notifications/:notificationId", delete(protected::notification_delete))
        // Accounts
        .route("/api/auth/whoami", get(protected::whoami))
        .route("/api/users", post(protected::user_create))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn fallback(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}

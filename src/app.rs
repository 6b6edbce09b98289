use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::AppConfig;
use crate::database::{ApplicationStore, LeaseStore, ManagerStore, PropertyStore, StoreHealth, TenantStore};
use crate::geo::{CoordinateCodec, Geocoder};
use crate::handlers;
use crate::services::{
    ApplicationService, LeaseService, ManagerService, PropertyService, SearchQueryComposer, TenantService,
};

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub search: SearchQueryComposer,
    pub properties: PropertyService,
    pub tenants: TenantService,
    pub managers: ManagerService,
    pub leases: LeaseService,
    pub applications: ApplicationService,
    pub health: Arc<dyn StoreHealth>,
}

impl AppState {
    /// Wires every service to one backing store
    pub fn new<S>(store: Arc<S>, codec: Arc<dyn CoordinateCodec>, geocoder: Arc<dyn Geocoder>) -> Self
    where
        S: PropertyStore + TenantStore + ManagerStore + LeaseStore + ApplicationStore + StoreHealth + 'static,
    {
        Self {
            search: SearchQueryComposer::new(store.clone(), codec.clone()),
            properties: PropertyService::new(store.clone(), store.clone(), codec.clone(), geocoder),
            tenants: TenantService::new(store.clone(), store.clone(), codec),
            managers: ManagerService::new(store.clone()),
            leases: LeaseService::new(store.clone()),
            applications: ApplicationService::new(store.clone(), store.clone(), store.clone()),
            health: store,
        }
    }
}

pub fn router(state: AppState, config: &AppConfig) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health))
        .merge(property_routes())
        .merge(tenant_routes())
        .merge(manager_routes())
        .merge(lease_routes())
        .merge(application_routes())
        .with_state(state)
        .layer(TimeoutLayer::new(Duration::from_secs(config.api.request_timeout_secs)));

    if let Some(cors) = cors_layer(config) {
        app = app.layer(cors);
    }
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }
    app
}

fn property_routes() -> Router<AppState> {
    use handlers::properties;

    Router::new()
        .route("/properties", get(properties::list).post(properties::create))
        .route("/properties/:id", get(properties::show))
}

fn tenant_routes() -> Router<AppState> {
    use handlers::tenants;

    Router::new()
        .route("/tenants", post(tenants::create))
        .route("/tenants/:cognito_id", get(tenants::show).put(tenants::update))
        .route("/tenants/:cognito_id/current-residences", get(tenants::current_residences))
        .route(
            "/tenants/:cognito_id/favorites/:property_id",
            post(tenants::add_favorite).delete(tenants::remove_favorite),
        )
}

fn manager_routes() -> Router<AppState> {
    use handlers::managers;

    Router::new()
        .route("/managers", post(managers::create))
        .route("/managers/:cognito_id", get(managers::show).put(managers::update))
        .route("/managers/:cognito_id/properties", get(managers::properties))
}

fn lease_routes() -> Router<AppState> {
    use handlers::leases;

    Router::new()
        .route("/leases", get(leases::list))
        .route("/leases/:id/payments", get(leases::payments))
}

fn application_routes() -> Router<AppState> {
    use handlers::applications;

    Router::new()
        .route("/applications", get(applications::list).post(applications::create))
        .route("/applications/:id/status", put(applications::update_status))
}

/// `None` when CORS is disabled; `*` among the origins allows any origin
fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    let security = &config.security;
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.iter().any(|o| o == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any))
}

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::config;
use crate::handlers;
use crate::services::ResourceService;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: ResourceService,
}

impl AppState {
    pub fn new(service: ResourceService) -> Self {
        Self { service }
    }
}

/// Full application router
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Record API
        .merge(data_routes())
        .with_state(state)
        // Global middleware
        .layer(DefaultBodyLimit::max(config().api.max_request_size_bytes))
        .layer(TraceLayer::new_for_http());

    if config().security.enable_cors {
        router = router.layer(cors_layer());
    }
    router
}

fn data_routes() -> Router<AppState> {
    use handlers::data;

    Router::new()
        // Resource-level operations (collection)
        .route("/api/v1/:resource", get(data::resource_get).post(data::resource_post))
        // Record-level operations (individual)
        .route(
            "/api/v1/:resource/:id",
            get(data::record_get).put(data::record_put).delete(data::record_delete),
        )
}

fn cors_layer() -> CorsLayer {
    if crate::is_development!() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config()
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

//! Router configuration for the API.
//!
//! Collects every route into one OpenAPI document, serves Swagger UI next to
//! it and applies the middleware stack.

use std::time::Duration;

use axum::{Router, http::StatusCode, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    global_error_handler, logging_middleware, not_found_fallback, request_id_middleware,
};
use crate::config::ServerConfig;
use crate::state::AppState;

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";
pub const SWAGGER_UI_PATH: &str = "/swagger-ui";

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Last added runs first, so a request passes through:
/// 1. CORS (when enabled)
/// 2. Request ID
/// 3. Logging
/// 4. Compression
/// 5. Error envelope rewriting
/// 6. Request timeout
///
/// # Routes
/// - `/api/villas` - Villa CRUD and JSON Patch
/// - `/health` - Health probes
/// - `/swagger-ui` - API documentation
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(handlers::villas::villa_routes())
        .merge(handlers::health::health_routes())
        .split_for_parts();

    let router = router
        .merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, api))
        .fallback(not_found_fallback)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout),
        ))
        .layer(middleware::from_fn(global_error_handler))
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state);

    if config.cors_enabled {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

//! GeoGate API Gateway
//!
//! The proxy surface for mapping API calls:
//! - Access gate (shared-secret check) on every operation route
//! - Table-driven request forwarding to the upstream provider
//! - Public health/status/capability endpoints

pub mod handlers;
pub mod middleware;
pub mod netinfo;

use axum::{middleware::from_fn_with_state, routing::get, Extension, Router};
use geogate_common::{config::AppConfig, ops::OPERATIONS, upstream::UpstreamClient};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub upstream: Arc<UpstreamClient>,
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    // CORS configuration: the mini-program runtime calls from arbitrary origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // Operation routes: one GET/POST pair per table entry, all behind the gate
    let mut operations = Router::new();
    for operation in OPERATIONS {
        operations = operations.route(
            &operation.route_path(),
            get(handlers::proxy::forward_get)
                .post(handlers::proxy::forward_post)
                .layer(Extension(operation)),
        );
    }
    let operations = operations.layer(from_fn_with_state(
        state.clone(),
        middleware::auth::require_password,
    ));

    // Compose the app
    Router::new()
        // Public endpoints (no credential)
        .route("/", get(handlers::index::index))
        .route("/health", get(handlers::health::health))
        .route("/api-status", get(handlers::health::api_status))
        .merge(operations)
        .fallback(handlers::proxy::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

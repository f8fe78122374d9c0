//! HTTP routing
//!
//! Every endpoint lives under `/api`; `create_app` wires the routers,
//! request tracing and CORS into one `Router`.

pub mod driver_routes;
pub mod health_routes;
pub mod point_routes;
pub mod route_routes;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::EnvironmentConfig;
use crate::middleware::cors::cors_layer;
use crate::state::AppState;

pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes::create_health_router())
        .nest("/drivers", driver_routes::create_driver_router())
        .nest("/points", point_routes::create_point_router())
        .nest("/routes", route_routes::create_route_router())
}

pub fn create_app(state: AppState, config: &EnvironmentConfig) -> Router {
    Router::new()
        .nest("/api", create_api_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.allowed_origins))
        .with_state(state)
}

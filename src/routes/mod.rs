pub mod car_requests;
pub mod cars;
pub mod gateway;
pub mod health;
pub mod identity;
pub mod metrics;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    state::{GatewayState, IdentityState, ResourceState},
};

pub fn identity_router(state: IdentityState) -> Router {
    Router::new()
        .route("/ping", get(health::ping))
        .route("/health", get(health::identity_health))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/authenticate", post(identity::authenticate))
        .route("/register", post(identity::register))
        .route("/check_token", post(identity::check_token))
        .route("/users/{id}", put(identity::update_user))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn resource_router(state: ResourceState) -> Router {
    Router::new()
        .route("/ping", get(health::ping))
        .route("/health", get(health::resource_health))
        .route("/metrics", get(metrics::metrics_handler))
        // Cars
        .route("/cars", get(cars::list_cars).post(cars::create_car))
        .route(
            "/cars/{id}",
            get(cars::get_car).put(cars::update_car).delete(cars::delete_car),
        )
        // Car requests
        .route(
            "/car_requests",
            get(car_requests::list_car_requests).post(car_requests::create_car_request),
        )
        .route(
            "/car_requests/{id}",
            get(car_requests::get_car_request).put(car_requests::update_car_request),
        )
        .route("/driver/car_requests", get(car_requests::list_assigned_car_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn gateway_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(gateway::broker).post(gateway::handle_submission))
        .route("/ping", get(health::ping))
        .route("/metrics", get(metrics::metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for browser clients. An empty origin list accepts any origin.
pub fn cors(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
        ]))
        .allow_origin(allow_origin)
}

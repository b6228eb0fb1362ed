use crate::models::AppState;
use axum::Router;
use axum::http::header;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod appointment_routes;
pub mod doctor_routes;
pub mod home_routes;
pub mod patient_routes;
pub mod stats_routes;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(appointment_routes::router())
        .merge(patient_routes::router())
        .merge(doctor_routes::router())
        .merge(stats_routes::router())
        .merge(home_routes::router())
        .with_state(state)
}

/// Router plus the layers the desk frontend needs (browser preflight, request tracing).
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

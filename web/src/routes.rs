//! Router configuration for the registration service.

use crate::handlers::{health_check, method_not_allowed, register};
use crate::middleware::correlation_id_layer;
use crate::state::AppState;
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Path of the registration endpoint.
pub const REGISTER_PATH: &str = "/api/register-participants";

/// Build the complete Axum router.
///
/// - `GET /health`: liveness probe
/// - `POST /api/register-participants`: registration; other methods get 405
///
/// Every response carries an `X-Correlation-ID` header.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health_check))
        .route(REGISTER_PATH, post(register).fallback(method_not_allowed))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(correlation_id_layer())
        .with_state(state)
}

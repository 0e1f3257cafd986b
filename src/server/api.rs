//! API route definitions

use std::sync::Arc;

use axum::{
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use super::{handlers, state::AppState};

async fn handle_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": true,
            "message": "Not found. Visit /health to check API status.",
        })),
    )
}

async fn handle_405() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "error": true,
            "message": "Method not allowed. Use GET for /health and /metadata, POST for /predict and /explain.",
        })),
    )
}

/// `"*"` (or an empty list) allows any origin; otherwise only the listed ones.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter(|o| o.as_str() != "*")
        .filter_map(|o| o.parse::<HeaderValue>().ok())
        .collect();

    let allow_origin = if parsed.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the main application router
pub fn create_router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/metadata", get(handlers::get_metadata))
        .route("/predict", post(handlers::predict))
        .route("/explain", post(handlers::explain))
        .fallback(handle_404)
        .method_not_allowed_fallback(handle_405)
        .with_state(state)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

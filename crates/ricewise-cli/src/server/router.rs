//! Routes and middleware for both services.

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::handlers::{chat, health, predict};
use crate::server::state::{AppState, ClassifierState};

/// Routes of the chat service.
pub fn chat_router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/test", get(health::diagnostics))
        .route("/api/chat", post(chat::chat))
        .with_state(state)
        .layer(build_cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Routes of the image classification service.
pub fn classifier_router(
    state: Arc<ClassifierState>,
    cors_origins: &[String],
    max_upload_bytes: usize,
) -> Router {
    Router::new()
        .route("/health", get(health::classifier_health))
        .route("/predict", post(predict::predict))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(build_cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Any origin when the list is empty, otherwise only the listed ones.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let parsed = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect::<Vec<_>>();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

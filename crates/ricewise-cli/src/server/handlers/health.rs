//! Health and diagnostics endpoints.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ricewise_core::{epoch_seconds, DiagnosticsResponse, HealthResponse};
use serde::Serialize;
use std::sync::Arc;

use crate::server::headers::no_cache;
use crate::server::state::{AppState, ClassifierState};

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::new(state.is_ready()))
}

pub async fn diagnostics(State(state): State<Arc<AppState>>) -> Response {
    let ready = state.is_ready();
    no_cache(Json(DiagnosticsResponse {
        message: "Backend is working!".to_string(),
        llm_loaded: ready,
        vector_db_loaded: ready,
        timestamp: epoch_seconds(),
    }))
}

#[derive(Serialize)]
pub struct ClassifierHealth {
    status: &'static str,
    model: String,
    classes: Vec<String>,
}

pub async fn classifier_health(State(state): State<Arc<ClassifierState>>) -> impl IntoResponse {
    let classifier = &state.classifier;
    Json(ClassifierHealth {
        status: "healthy",
        model: classifier.output_name().to_string(),
        classes: classifier.class_names().as_slice().to_vec(),
    })
}

//! Question answering endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use ricewise_core::ChatRequest;
use std::sync::Arc;
use tracing::{error, info};

use crate::server::error::ApiError;
use crate::server::headers::no_cache;
use crate::server::state::AppState;

pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let context = state.chat().ok_or_else(ApiError::not_ready)?;

    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let question = request
        .question(context.max_question_chars())
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    info!("Processing message: {}", question);

    let answer = context.pipeline().answer(question).await.map_err(|e| {
        error!("Error processing request: {}", e);
        ApiError::Internal(format!("Error processing request: {}", e))
    })?;

    let response = context.build_response(question, answer);
    info!(
        "Response sent ({} sources, {:.2}s)",
        response.sources.len(),
        response.processing_time_seconds
    );
    Ok(no_cache(Json(response)))
}

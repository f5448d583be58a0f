//! Image classification endpoint.

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use ricewise_core::ClassificationResponse;
use ricewise_vision::VisionError;
use std::sync::Arc;
use tracing::{error, info};

use crate::server::error::ApiError;
use crate::server::state::ClassifierState;

/// Multipart field carrying the upload.
const IMAGE_FIELD: &str = "image";

pub async fn predict(
    State(state): State<Arc<ClassifierState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ClassificationResponse>, ApiError> {
    let mut multipart = multipart?;
    let image = read_image_field(&mut multipart).await?;

    let classifier = state.classifier.clone();
    let prediction = tokio::task::spawn_blocking(move || classifier.predict(&image))
        .await
        .map_err(ApiError::internal)?
        .map_err(|e| match e {
            VisionError::Image(_) => ApiError::BadRequest(e.to_string()),
            other => {
                error!("Prediction failed: {}", other);
                ApiError::internal(other)
            }
        })?;

    info!("Predicted {}", prediction.label);
    Ok(Json(prediction.into()))
}

async fn read_image_field(multipart: &mut Multipart) -> Result<Bytes, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let data = field.bytes().await?;
        if data.is_empty() {
            return Err(ApiError::BadRequest("Uploaded image is empty".to_string()));
        }
        return Ok(data);
    }

    Err(ApiError::BadRequest(format!(
        "Missing '{}' file field",
        IMAGE_FIELD
    )))
}

//! Image upload classification handler.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use tracing::{error, info};
use uuid::Uuid;

use crate::dto::PredictResponse;
use crate::error::AppError;
use crate::services::prediction as prediction_service;
use crate::AppState;

const FILE_FIELD: &str = "file";

/// POST /predict - Classify an uploaded leaf image.
///
/// The model is checked before the body is read, so an unloaded model yields
/// 503 for any payload.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictResponse>, AppError> {
    let classifier = state.classifier()?;
    let request_id = Uuid::new_v4();

    let bytes = read_file_field(multipart?).await?;
    info!(%request_id, bytes = bytes.len(), "Classifying upload");

    let result = prediction_service::run_prediction(&state, classifier, bytes)
        .await
        .map_err(|e| {
            error!(%request_id, "Prediction failed: {:?}", e);
            e
        })?;

    info!(
        %request_id,
        prediction = %result.prediction,
        confidence = result.confidence,
        "Prediction complete"
    );
    Ok(Json(PredictResponse { success: true, result }))
}

async fn read_file_field(mut multipart: Multipart) -> Result<Bytes, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(FILE_FIELD) {
            return Ok(field.bytes().await?);
        }
    }
    Err(AppError::missing_file())
}

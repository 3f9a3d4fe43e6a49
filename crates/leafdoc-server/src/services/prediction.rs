//! Blocking inference off the async runtime.

use std::sync::Arc;

use axum::body::Bytes;
use leafdoc_core::PredictionResult;
use leafdoc_vision::{classify_bytes, Classifier};

use crate::error::AppError;
use crate::AppState;

/// Decodes, classifies and attaches the recommendation for one upload.
///
/// Work runs on the blocking pool and is bounded by the state's inference
/// timeout. A timed-out task keeps running in the background; its result is
/// discarded.
pub async fn run_prediction(
    state: &AppState,
    classifier: Arc<dyn Classifier>,
    bytes: Bytes,
) -> Result<PredictionResult, AppError> {
    let task = tokio::task::spawn_blocking(move || classify_bytes(classifier.as_ref(), &bytes));

    let prediction = match tokio::time::timeout(state.inference_timeout, task).await {
        Ok(Ok(result)) => result?,
        Ok(Err(e)) => return Err(AppError::Processing(format!("inference task failed: {}", e))),
        Err(_) => {
            return Err(AppError::Processing(format!(
                "inference timed out after {} ms",
                state.inference_timeout.as_millis()
            )))
        }
    };

    let recommendation = state.recommendations.for_label(prediction.label).clone();
    Ok(PredictionResult::new(prediction, recommendation))
}

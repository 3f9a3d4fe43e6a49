//! Application error types and Axum response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use leafdoc_vision::VisionError;
use serde::Serialize;

/// Application-level errors with HTTP status code mapping.
#[derive(Debug)]
pub enum AppError {
    /// No model was loaded at startup.
    ModelUnavailable,
    /// The request carried no usable upload.
    InvalidUpload { status: StatusCode, message: String },
    /// Decoding, preprocessing or inference failed.
    Processing(String),
}

impl AppError {
    pub fn missing_file() -> Self {
        AppError::InvalidUpload {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "no `file` field in multipart upload".into(),
        }
    }
}

impl From<VisionError> for AppError {
    fn from(e: VisionError) -> Self {
        AppError::Processing(e.to_string())
    }
}

impl From<axum::extract::multipart::MultipartRejection> for AppError {
    fn from(e: axum::extract::multipart::MultipartRejection) -> Self {
        AppError::InvalidUpload { status: e.status(), message: e.body_text() }
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(e: axum::extract::multipart::MultipartError) -> Self {
        AppError::InvalidUpload { status: e.status(), message: e.body_text() }
    }
}

#[derive(Serialize)]
struct UnavailableResponse {
    error: &'static str,
}

#[derive(Serialize)]
struct FailureResponse {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::ModelUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(UnavailableResponse { error: "Model not loaded" }),
            )
                .into_response(),
            AppError::InvalidUpload { status, message } => {
                (status, Json(FailureResponse { success: false, error: message })).into_response()
            }
            AppError::Processing(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FailureResponse { success: false, error: message }),
            )
                .into_response(),
        }
    }
}

//! HTTP route handlers for the leafdoc server.

pub mod predict;
pub mod recommendations;

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::{HealthResponse, RootResponse, SERVICE_NAME};
use crate::AppState;

/// Service banner.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse { message: SERVICE_NAME, status: "running" })
}

/// Health check endpoint. Reports whether inference is available.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy", model_loaded: state.model_loaded() })
}

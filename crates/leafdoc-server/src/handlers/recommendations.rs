use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::RecommendationsResponse;
use crate::AppState;

/// GET /recommendations - Every record in the table, including non-model labels.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<RecommendationsResponse> {
    Json(RecommendationsResponse {
        success: true,
        recommendations: state.recommendations.records().clone(),
    })
}

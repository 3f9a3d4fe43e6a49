use std::collections::BTreeMap;

use leafdoc_core::{PredictionResult, RecommendationRecord};
use serde::Serialize;

pub const SERVICE_NAME: &str = "Chili Nutrient Deficiency Detection API";

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: PredictionResult,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub success: bool,
    pub recommendations: BTreeMap<String, RecommendationRecord>,
}

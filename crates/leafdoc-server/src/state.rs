//! Shared application state.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use leafdoc_config::{ConfigError, RecommendationTable, ServerConfig};
use leafdoc_core::ClassLabel;
use leafdoc_vision::{Classifier, OnnxClassifier};
use tracing::{info, warn};

use crate::error::AppError;

/// Outcome of the single startup model load.
pub enum ModelSlot {
    Ready(Arc<dyn Classifier>),
    Unavailable { reason: String },
}

impl ModelSlot {
    /// Attempts to load the ONNX model at `path`. Failure is logged and kept,
    /// not returned.
    pub fn load(path: &Path) -> Self {
        match OnnxClassifier::load(path, ClassLabel::COUNT) {
            Ok(model) => {
                info!("Model loaded successfully");
                ModelSlot::Ready(Arc::new(model))
            }
            Err(e) => {
                warn!("Error loading model: {}", e);
                ModelSlot::Unavailable { reason: e.to_string() }
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelSlot::Ready(_))
    }
}

/// Immutable state shared by all handlers.
pub struct AppState {
    pub model: ModelSlot,
    pub recommendations: RecommendationTable,
    pub inference_timeout: Duration,
}

impl AppState {
    pub fn new(model: ModelSlot, recommendations: RecommendationTable, inference_timeout: Duration) -> Self {
        Self { model, recommendations, inference_timeout }
    }

    /// Builds state from configuration.
    ///
    /// An invalid recommendation table is an error; a model that fails to
    /// load leaves the server running without inference.
    pub fn load(config: &ServerConfig) -> Result<Self, ConfigError> {
        let recommendations = config.load_recommendations()?;
        info!("Loaded {} recommendation records", recommendations.records().len());

        let model = ModelSlot::load(&config.model_path);

        Ok(Self::new(model, recommendations, config.inference_timeout))
    }

    /// Returns the loaded classifier, or `ModelUnavailable` with the startup
    /// load failure logged.
    pub fn classifier(&self) -> Result<Arc<dyn Classifier>, AppError> {
        match &self.model {
            ModelSlot::Ready(model) => Ok(Arc::clone(model)),
            ModelSlot::Unavailable { reason } => {
                warn!("Rejecting inference, model unavailable: {}", reason);
                Err(AppError::ModelUnavailable)
            }
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_ready()
    }
}

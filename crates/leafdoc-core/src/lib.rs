//! Core domain types and error definitions for leafdoc.
//!
//! This crate provides the types shared across the leafdoc workspace:
//!
//! - [`ClassLabel`] — The fixed set of classes the model predicts, in output order
//! - [`RecommendationRecord`] — Agronomic guidance attached to a label
//! - [`Prediction`] — Arg-max result over a model output vector
//! - [`PredictionResult`] — A prediction joined with its recommendation
//! - [`CoreError`] — Error type for label parsing
//!
//! # Example
//!
//! ```rust
//! use leafdoc_core::ClassLabel;
//!
//! assert_eq!(ClassLabel::from_index(3), Some(ClassLabel::Nitrogen));
//! assert_eq!(ClassLabel::Healthy.as_str(), "healthy");
//! assert_eq!(ClassLabel::COUNT, 6);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by core domain conversions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The string does not name one of the model classes.
    #[error("Unknown class label: {0}")]
    UnknownLabel(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Labels
// ─────────────────────────────────────────────────────────────────────────────

/// A class the leaf classifier can predict.
///
/// Declaration order is the model's output index order. `Ord` follows it, so
/// ordered maps keyed by label iterate in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClassLabel {
    Calcium,
    #[serde(rename = "healthy")]
    Healthy,
    Magnesium,
    Nitrogen,
    Phosphorus,
    Potassium,
}

impl ClassLabel {
    /// All labels, indexed by model output position.
    pub const ALL: [ClassLabel; 6] = [
        ClassLabel::Calcium,
        ClassLabel::Healthy,
        ClassLabel::Magnesium,
        ClassLabel::Nitrogen,
        ClassLabel::Phosphorus,
        ClassLabel::Potassium,
    ];

    /// Number of classes the model must emit scores for.
    pub const COUNT: usize = Self::ALL.len();

    /// Maps a model output index to its label.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Position of this label in the model output.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Wire name of the label.
    pub fn as_str(self) -> &'static str {
        match self {
            ClassLabel::Calcium => "Calcium",
            ClassLabel::Healthy => "healthy",
            ClassLabel::Magnesium => "Magnesium",
            ClassLabel::Nitrogen => "Nitrogen",
            ClassLabel::Phosphorus => "Phosphorus",
            ClassLabel::Potassium => "Potassium",
        }
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassLabel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| CoreError::UnknownLabel(s.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Recommendations
// ─────────────────────────────────────────────────────────────────────────────

/// Static agronomic guidance for a single label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    /// Visible leaf symptoms of the deficiency.
    pub symptoms: String,
    /// Organic fertilizer that corrects it.
    pub organic_fertilizer: String,
    /// Physical form of the fertilizer.
    pub form: String,
    pub dosage_per_plant: String,
    pub sunlight_requirement: String,
    pub humidity_requirement: String,
    /// Severity bucket ("none", "moderate", "high").
    pub severity: String,
    /// Display color hint for clients.
    pub color: String,
}

impl RecommendationRecord {
    /// Returns every field as a `(name, value)` pair, in wire order.
    pub fn fields(&self) -> [(&'static str, &str); 8] {
        [
            ("symptoms", self.symptoms.as_str()),
            ("organic_fertilizer", self.organic_fertilizer.as_str()),
            ("form", self.form.as_str()),
            ("dosage_per_plant", self.dosage_per_plant.as_str()),
            ("sunlight_requirement", self.sunlight_requirement.as_str()),
            ("humidity_requirement", self.humidity_requirement.as_str()),
            ("severity", self.severity.as_str()),
            ("color", self.color.as_str()),
        ]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Predictions
// ─────────────────────────────────────────────────────────────────────────────

/// Top class and per-class probabilities for one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: ClassLabel,
    /// Model probability for `label`.
    pub confidence: f32,
    /// Probability for every label, in output order.
    pub probabilities: BTreeMap<ClassLabel, f32>,
}

/// A prediction joined with the recommendation for its label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub prediction: ClassLabel,
    pub confidence: f32,
    pub class_probabilities: BTreeMap<ClassLabel, f32>,
    pub recommendation: RecommendationRecord,
}

impl PredictionResult {
    pub fn new(prediction: Prediction, recommendation: RecommendationRecord) -> Self {
        Self {
            prediction: prediction.label,
            confidence: prediction.confidence,
            class_probabilities: prediction.probabilities,
            recommendation,
        }
    }
}

//! Static recommendation table.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use leafdoc_core::{ClassLabel, RecommendationRecord};

use crate::ConfigError;

const BUILTIN_RECOMMENDATIONS: &str = include_str!("../data/recommendations.json");

/// Read-only map from label name to [`RecommendationRecord`].
///
/// Only constructed through validation: every [`ClassLabel`] has a record and
/// no record has an empty field. Extra entries (such as `Iron`) are allowed and
/// are served by the listing endpoint only.
#[derive(Debug, Clone)]
pub struct RecommendationTable {
    records: BTreeMap<String, RecommendationRecord>,
    fallback: RecommendationRecord,
}

impl RecommendationTable {
    /// Loads the table compiled into the binary.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN_RECOMMENDATIONS)
    }

    /// Loads a table from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let records: BTreeMap<String, RecommendationRecord> = serde_json::from_str(content)?;
        Self::from_records(records)
    }

    /// Validates the records and builds the table.
    pub fn from_records(records: BTreeMap<String, RecommendationRecord>) -> Result<Self, ConfigError> {
        for label in ClassLabel::ALL {
            if !records.contains_key(label.as_str()) {
                return Err(ConfigError::MissingLabel(label.as_str().to_string()));
            }
        }

        for (label, record) in &records {
            if let Some((field, _)) = record.fields().into_iter().find(|(_, v)| v.trim().is_empty()) {
                return Err(ConfigError::EmptyField { label: label.clone(), field });
            }
        }

        let fallback = records
            .get(ClassLabel::Healthy.as_str())
            .cloned()
            .ok_or_else(|| ConfigError::MissingLabel(ClassLabel::Healthy.as_str().to_string()))?;

        Ok(Self { records, fallback })
    }

    /// Returns the record for `label`, or the `healthy` record when the label
    /// is not in the table.
    pub fn lookup(&self, label: &str) -> &RecommendationRecord {
        match self.records.get(label) {
            Some(record) => record,
            None => {
                tracing::warn!("No recommendation for label {:?}, using healthy", label);
                &self.fallback
            }
        }
    }

    pub fn for_label(&self, label: ClassLabel) -> &RecommendationRecord {
        self.lookup(label.as_str())
    }

    /// All records, including entries that are not model classes.
    pub fn records(&self) -> &BTreeMap<String, RecommendationRecord> {
        &self.records
    }
}

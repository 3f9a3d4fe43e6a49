//! Configuration for the leafdoc service.
//!
//! - [`RecommendationTable`] — Validated, read-only agronomic advice keyed by label
//! - [`ServerConfig`] — Listener, model path and request limits from the environment
//! - [`ConfigError`] — Errors from loading or validating either of them

mod recommendations;
mod server;

pub use recommendations::RecommendationTable;
pub use server::ServerConfig;

// ─────────────────────────────────────────────────────────────────────────────
// Error
// ─────────────────────────────────────────────────────────────────────────────

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Recommendation missing for label: {0}")]
    MissingLabel(String),

    #[error("Recommendation for {label} has empty field: {field}")]
    EmptyField { label: String, field: &'static str },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

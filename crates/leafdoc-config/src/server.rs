//! Server settings read from the environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::{ConfigError, RecommendationTable};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MODEL_PATH: &str = "models/chilli_nutrient_model.onnx";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_INFERENCE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// ONNX model artifact loaded once at startup.
    pub model_path: PathBuf,
    /// Overrides the built-in recommendation table when set.
    pub recommendations_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
    pub inference_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            recommendations_path: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            inference_timeout: Duration::from_secs(DEFAULT_INFERENCE_TIMEOUT_SECS),
        }
    }
}

impl ServerConfig {
    /// Reads settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`. Unset or blank variables take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_secs: u64 = parse_var(
            get("INFERENCE_TIMEOUT_SECS"),
            "INFERENCE_TIMEOUT_SECS",
            DEFAULT_INFERENCE_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "INFERENCE_TIMEOUT_SECS",
                value: "0".into(),
            });
        }

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            port: parse_var(get("PORT"), "PORT", DEFAULT_PORT)?,
            model_path: get("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
            recommendations_path: get("RECOMMENDATIONS_PATH").map(PathBuf::from),
            max_upload_bytes: parse_var(get("MAX_UPLOAD_BYTES"), "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            inference_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Loads the configured recommendation table, or the built-in one.
    pub fn load_recommendations(&self) -> Result<RecommendationTable, ConfigError> {
        match &self.recommendations_path {
            Some(path) => RecommendationTable::load_from_file(path),
            None => RecommendationTable::builtin(),
        }
    }
}

fn parse_var<T: FromStr>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    let Some(value) = raw else {
        return Ok(default);
    };
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}

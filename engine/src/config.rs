use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_validator_model_path")]
    pub validator_model_path: PathBuf,
    #[serde(default = "default_risk_model_path")]
    pub risk_model_path: PathBuf,
    /// Directory receiving the annotated derivative images.
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    /// Directory receiving the generated PDF reports.
    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,
    /// Upper bound on waiting for a model's inference guard, in seconds.
    #[serde(default = "default_inference_timeout_secs")]
    pub inference_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            validator_model_path: default_validator_model_path(),
            risk_model_path: default_risk_model_path(),
            results_dir: default_results_dir(),
            reports_dir: default_reports_dir(),
            inference_timeout_secs: default_inference_timeout_secs(),
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_yaml::from_str(&raw)?;
        Ok(config)
    }
}

fn default_validator_model_path() -> PathBuf {
    PathBuf::from("models/mr_validator_model.pt")
}

fn default_risk_model_path() -> PathBuf {
    PathBuf::from("models/cancer_risk_model.pt")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("static/results")
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from("static/reports")
}

fn default_inference_timeout_secs() -> u64 {
    30
}

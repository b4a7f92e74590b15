use chrono::Local;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use shared::AnalysisResponse;

use crate::config::EngineConfig;
use crate::error::{AnalysisError, ModelError};
use crate::imaging::{loader, overlay};
use crate::inference::model::{
    Classifier, RISK_INPUT_SIZE, TorchClassifier, VALIDATOR_INPUT_SIZE,
};
use crate::inference::policy::{self, AccentColor, RiskLabel};
use crate::report::{self, content::ReportContent};

/// Below this validity confidence an input is rejected as not being an MR
/// scan. The threshold is exclusive: exactly 0.5 passes.
pub const VALIDITY_THRESHOLD: f32 = 0.5;

/// The two classifier handles, loaded once at process start.
pub struct ModelSet {
    pub validator: Arc<dyn Classifier>,
    pub risk: Arc<dyn Classifier>,
}

impl ModelSet {
    pub fn load(config: &EngineConfig) -> Result<Self, ModelError> {
        let lock_timeout = Duration::from_secs(config.inference_timeout_secs);
        let validator = TorchClassifier::load(
            &config.validator_model_path,
            VALIDATOR_INPUT_SIZE,
            lock_timeout,
        )?;
        let risk =
            TorchClassifier::load(&config.risk_model_path, RISK_INPUT_SIZE, lock_timeout)?;
        Ok(Self {
            validator: Arc::new(validator),
            risk: Arc::new(risk),
        })
    }
}

/// Immutable value produced once per analyzed image.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceResult {
    pub is_valid_modality: bool,
    pub validity_confidence: f32,
    /// Raw risk score in [0,1], kept for the overlay opacity.
    pub risk_probability: f32,
    /// Display percentage, rounded to two decimals.
    pub risk_percent: f32,
    pub risk_label: RiskLabel,
    pub accent_color: AccentColor,
}

#[derive(Debug)]
pub struct CompletedAnalysis {
    pub result: InferenceResult,
    pub original_path: PathBuf,
    pub processed_path: PathBuf,
    pub pdf_path: PathBuf,
}

/// Outcome of a pipeline run. A rejection is an expected branch, not a
/// system failure; callers must treat the two differently.
#[derive(Debug)]
pub enum Analysis {
    Rejected {
        validity_confidence: f32,
        message: String,
    },
    Completed(CompletedAnalysis),
}

impl Analysis {
    pub fn into_response(self) -> AnalysisResponse {
        match self {
            Analysis::Rejected { message, .. } => AnalysisResponse::failure(message),
            Analysis::Completed(analysis) => AnalysisResponse {
                success: true,
                message: None,
                risk_score: Some(analysis.result.risk_percent),
                risk_label: Some(analysis.result.risk_label.display().to_string()),
                original_path: Some(analysis.original_path.to_string_lossy().into_owned()),
                processed_path: Some(analysis.processed_path.to_string_lossy().into_owned()),
                pdf_path: Some(analysis.pdf_path.to_string_lossy().into_owned()),
                color_code: Some(analysis.result.accent_color.code().to_string()),
            },
        }
    }
}

pub struct AnalysisEngine {
    models: Option<ModelSet>,
    config: EngineConfig,
}

impl AnalysisEngine {
    /// Loads both models once. On failure the engine stays up in a degraded
    /// state and every analysis short-circuits with `ModelUnavailable`.
    pub fn new(config: EngineConfig) -> Self {
        let models = match ModelSet::load(&config) {
            Ok(set) => Some(set),
            Err(e) => {
                error!("model loading failed, engine is degraded: {e}");
                None
            }
        };
        Self::with_models(models, config)
    }

    pub fn with_models(models: Option<ModelSet>, config: EngineConfig) -> Self {
        Self { models, config }
    }

    pub fn is_available(&self) -> bool {
        self.models.is_some()
    }

    /// Runs the full pipeline on one image: validity gate, risk scoring,
    /// overlay rendering and report generation.
    pub fn analyze(&self, image_path: &Path) -> Result<Analysis, AnalysisError> {
        let models = self.models.as_ref().ok_or(AnalysisError::ModelUnavailable)?;

        let validator_input =
            loader::load_input_tensor(image_path, models.validator.input_size())?;
        let confidence = models.validator.score(&validator_input)?;

        if confidence < VALIDITY_THRESHOLD {
            info!(
                "rejected {}: validity confidence {:.4}",
                image_path.display(),
                confidence
            );
            return Ok(Analysis::Rejected {
                validity_confidence: confidence,
                message: rejection_message(confidence),
            });
        }

        let risk_input = loader::load_input_tensor(image_path, models.risk.input_size())?;
        let risk_probability = models.risk.score(&risk_input)?;
        let risk_percent = (risk_probability * 10_000.0).round() / 100.0;
        let (risk_label, accent_color) = policy::classify_risk(risk_percent);

        let result = InferenceResult {
            is_valid_modality: true,
            validity_confidence: confidence,
            risk_probability,
            risk_percent,
            risk_label,
            accent_color,
        };

        let processed_path = overlay::render_annotated(
            image_path,
            &self.config.results_dir,
            risk_probability,
            accent_color,
        )?;

        let content =
            ReportContent::assemble(&result, image_path, &processed_path, Local::now());
        let pdf_path = report::pdf::write_pdf(&content, &self.config.reports_dir, image_path)?;

        info!(
            "analyzed {}: risk {:.2}% ({})",
            image_path.display(),
            result.risk_percent,
            result.accent_color.code()
        );

        Ok(Analysis::Completed(CompletedAnalysis {
            result,
            original_path: image_path.to_path_buf(),
            processed_path,
            pdf_path,
        }))
    }
}

fn rejection_message(confidence: f32) -> String {
    format!(
        "Yüklenen görüntü bir MR testi olarak algılanmadı.\n\
         (Güven Skoru: %{:.2})\n\
         Lütfen geçerli bir beyin MR görüntüsü yükleyin.",
        confidence * 100.0
    )
}

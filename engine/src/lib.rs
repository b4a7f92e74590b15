//! Two-stage MR scan analysis pipeline: modality validation, tumor risk
//! scoring, risk-proportional overlay rendering and PDF report generation.

pub mod config;
pub mod error;
pub mod imaging;
pub mod inference;
pub mod report;

pub use config::EngineConfig;
pub use error::{AnalysisError, InferenceError, ModelError, ReportError};
pub use inference::model::{Classifier, TorchClassifier};
pub use inference::pipeline::{
    Analysis, AnalysisEngine, CompletedAnalysis, InferenceResult, ModelSet,
};
pub use inference::policy::{AccentColor, RiskLabel};

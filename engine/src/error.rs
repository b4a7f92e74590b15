use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to load TorchScript module from {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: tch::TchError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("forward pass failed: {0}")]
    Forward(#[from] tch::TchError),
    #[error("input tensor is {got_width}x{got_height}, model expects {want_width}x{want_height}")]
    Geometry {
        got_width: usize,
        got_height: usize,
        want_width: u32,
        want_height: u32,
    },
    #[error("model busy: inference guard not acquired within {0:?}")]
    Busy(Duration),
    #[error("inference guard poisoned by an earlier panic")]
    Poisoned,
    #[error("model produced an empty output tensor")]
    EmptyOutput,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF generation failed: {0}")]
    Pdf(String),
    #[error("could not embed image {path}: {message}")]
    Image { path: PathBuf, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("classifier models are not loaded")]
    ModelUnavailable,
    #[error("failed to decode input image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write annotated image {path}: {source}")]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Report(#[from] ReportError),
}

impl AnalysisError {
    /// Message shown to the end user when a request fails, in the report
    /// language. Operational detail stays in the error chain and the logs.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::ModelUnavailable => {
                "AI modelleri yüklenemedi. Lütfen sunucu loglarını kontrol edin.".to_string()
            }
            AnalysisError::Decode { .. } => {
                "Yüklenen dosya bir görüntü olarak çözümlenemedi. \
                 Lütfen geçerli bir resim dosyası yükleyin."
                    .to_string()
            }
            _ => "Analiz sırasında beklenmeyen bir hata oluştu.".to_string(),
        }
    }
}

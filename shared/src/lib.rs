use serde::{Deserialize, Serialize};

/// Payload returned to the web layer for every analysis request.
///
/// `message` is only set on failure or rejection; the remaining optional
/// fields are only set on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_code: Option<String>,
}

impl AnalysisResponse {
    pub fn failure(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            risk_score: None,
            risk_label: None,
            original_path: None,
            processed_path: None,
            pdf_path: None,
            color_code: None,
        }
    }
}

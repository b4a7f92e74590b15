use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::inference::pipeline::InferenceResult;
use crate::inference::policy::AccentColor;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const PAGE_MARGIN_MM: f32 = 10.0;
pub const IMAGE_GAP_MM: f32 = 10.0;

pub const REPORT_TITLE: &str = "AKILLI MR ANALİZ ASİSTANI";

const DISCLAIMER: &str = "YASAL UYARI: Bu rapor Yapay Zeka (AI) tarafından oluşturulmuştur. \
     Kesinlikle tıbbi teşhis yerine geçmez. Sonuçlar sadece ön bilgi amaçlı olup, \
     kesin tanı için uzman bir doktora başvurulmalıdır.";

/// Width of each of the two side-by-side images.
pub fn side_by_side_width_mm() -> f32 {
    (PAGE_WIDTH_MM - 2.0 * PAGE_MARGIN_MM - IMAGE_GAP_MM) / 2.0
}

/// Structured payload handed to the page renderer. Everything textual the
/// report shows lives here; the renderer adds no content of its own.
#[derive(Debug, Clone)]
pub struct ReportContent {
    pub title: String,
    pub generated_at: String,
    pub source_filename: String,
    /// Already formatted to two decimals, rendered verbatim.
    pub risk_percent: String,
    pub risk_label: String,
    pub accent_color: AccentColor,
    pub original_image: PathBuf,
    pub annotated_image: PathBuf,
    pub original_caption: String,
    pub annotated_caption: String,
    pub disclaimer: String,
    pub footer: String,
    pub image_width_mm: f32,
}

impl ReportContent {
    pub fn assemble(
        result: &InferenceResult,
        original_path: &Path,
        annotated_path: &Path,
        generated_at: DateTime<Local>,
    ) -> Self {
        let source_filename = original_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| original_path.to_string_lossy().into_owned());

        Self {
            title: REPORT_TITLE.to_string(),
            generated_at: generated_at.format("%d-%m-%Y %H:%M").to_string(),
            source_filename,
            risk_percent: format!("{:.2}", result.risk_percent),
            risk_label: result.risk_label.display().to_string(),
            accent_color: result.accent_color,
            original_image: original_path.to_path_buf(),
            annotated_image: annotated_path.to_path_buf(),
            original_caption: "Orijinal Görüntü".to_string(),
            annotated_caption: "AI Risk Analizi".to_string(),
            disclaimer: DISCLAIMER.to_string(),
            footer: "Sayfa 1".to_string(),
            image_width_mm: side_by_side_width_mm(),
        }
    }
}

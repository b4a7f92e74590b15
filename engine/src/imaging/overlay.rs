use image::{DynamicImage, Rgb, RgbImage};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AnalysisError;
use crate::inference::policy::AccentColor;

/// Alpha byte of the full-canvas risk overlay. Capped at 100 rather than 255
/// so the scan underneath stays visible even at maximum risk.
pub fn overlay_alpha(risk_probability: f32) -> u8 {
    (risk_probability * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Composites a full-canvas rectangle in the accent color over the original
/// pixels (source-over in RGBA) and flattens the result to opaque RGB.
pub fn annotate(original: &DynamicImage, risk_probability: f32, color: AccentColor) -> RgbImage {
    let alpha = overlay_alpha(risk_probability) as u32;
    let (red, green, blue) = color.overlay_rgb();

    let base = original.to_rgba8();
    let mut out = RgbImage::new(base.width(), base.height());
    for (x, y, pixel) in base.enumerate_pixels() {
        let blend = |dst: u8, src: u8| -> u8 {
            ((src as u32 * alpha + dst as u32 * (255 - alpha) + 127) / 255) as u8
        };
        out.put_pixel(
            x,
            y,
            Rgb([
                blend(pixel[0], red),
                blend(pixel[1], green),
                blend(pixel[2], blue),
            ]),
        );
    }
    out
}

/// Renders the annotated derivative next to the analysis output directory as
/// `processed_<source filename>`.
pub fn render_annotated(
    original_path: &Path,
    results_dir: &Path,
    risk_probability: f32,
    color: AccentColor,
) -> Result<PathBuf, AnalysisError> {
    let img = image::open(original_path).map_err(|source| AnalysisError::Decode {
        path: original_path.to_path_buf(),
        source,
    })?;
    let annotated = annotate(&img, risk_probability, color);

    fs::create_dir_all(results_dir)?;
    let file_name = original_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scan".to_string());
    let out_path = results_dir.join(format!("processed_{file_name}"));

    annotated
        .save(&out_path)
        .map_err(|source| AnalysisError::ArtifactWrite {
            path: out_path.clone(),
            source,
        })?;
    info!(
        "annotated image written to {} (alpha {})",
        out_path.display(),
        overlay_alpha(risk_probability)
    );
    Ok(out_path)
}

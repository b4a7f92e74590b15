use log::info;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfLayerReference, Rgb,
};
use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::error::ReportError;
use crate::inference::policy::AccentColor;
use crate::report::content::{
    IMAGE_GAP_MM, PAGE_HEIGHT_MM, PAGE_MARGIN_MM, PAGE_WIDTH_MM, ReportContent,
};
use crate::report::transliterate::transliterate;

const PAGE_WIDTH: f64 = PAGE_WIDTH_MM as f64;
const PAGE_HEIGHT: f64 = PAGE_HEIGHT_MM as f64;
const PAGE_MARGIN: f64 = PAGE_MARGIN_MM as f64;
const IMAGE_GAP: f64 = IMAGE_GAP_MM as f64;

const EMBED_DPI: f64 = 300.0;
const MM_PER_PT: f64 = 0.352_778;
// Builtin fonts carry no metrics we can query; an average advance of half an
// em is close enough for centering and wrapping Helvetica.
const AVG_ADVANCE_EM: f64 = 0.5;

/// Renders the report payload to a single-page A4 PDF named
/// `report_<source filename>.pdf` under `reports_dir`.
pub fn write_pdf(
    content: &ReportContent,
    reports_dir: &Path,
    source_path: &Path,
) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(reports_dir)?;
    let file_name = source_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scan".to_string());
    let out_path = reports_dir.join(format!("report_{file_name}.pdf"));

    let title = transliterate(&content.title);
    let (doc, page_index, layer_index) =
        PdfDocument::new(&title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let layer = doc.get_page(page_index).get_layer(layer_index);

    let regular = add_font(&doc, BuiltinFont::Helvetica)?;
    let bold = add_font(&doc, BuiltinFont::HelveticaBold)?;
    let italic = add_font(&doc, BuiltinFont::HelveticaOblique)?;

    // Header.
    text_centered(&layer, &title, 15.0, 20.0, &bold);

    // Metadata block.
    let date_line = transliterate(&format!("Rapor Tarihi: {}", content.generated_at));
    let file_line = transliterate(&format!("Dosya Adı: {}", content.source_filename));
    text_left(&layer, &date_line, 12.0, 35.0, &regular);
    text_left(&layer, &file_line, 12.0, 43.0, &regular);

    // Result block.
    let risk_line = transliterate(&format!("TESPİT EDİLEN RİSK: %{}", content.risk_percent));
    text_centered(&layer, &risk_line, 16.0, 60.0, &bold);

    layer.set_fill_color(label_color(content.accent_color));
    let label_line = transliterate(&format!("({})", content.risk_label));
    text_centered(&layer, &label_line, 14.0, 70.0, &regular);
    layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));

    // Images, side by side. Captions sit a fixed offset below the image top,
    // so uneven aspect ratios never move them.
    let image_width = content.image_width_mm as f64;
    let images_top = 80.0;
    let left_x = PAGE_MARGIN;
    let right_x = PAGE_MARGIN + image_width + IMAGE_GAP;
    embed_image(&layer, &content.original_image, left_x, images_top, image_width)?;
    embed_image(&layer, &content.annotated_image, right_x, images_top, image_width)?;

    let caption_y = images_top + image_width + 5.0;
    text_centered_at(
        &layer,
        &transliterate(&content.original_caption),
        10.0,
        caption_y,
        left_x + image_width / 2.0,
        &bold,
    );
    text_centered_at(
        &layer,
        &transliterate(&content.annotated_caption),
        10.0,
        caption_y,
        right_x + image_width / 2.0,
        &bold,
    );

    // Disclaimer, anchored 50mm above the page bottom.
    let disclaimer = transliterate(&content.disclaimer);
    let usable_width = PAGE_WIDTH - 2.0 * PAGE_MARGIN;
    let mut line_y = PAGE_HEIGHT - 50.0;
    for line in wrap_text(&disclaimer, 8.0, usable_width) {
        text_left(&layer, &line, 8.0, line_y, &regular);
        line_y += 5.0;
    }

    // Footer.
    text_centered(
        &layer,
        &transliterate(&content.footer),
        8.0,
        PAGE_HEIGHT - 15.0,
        &italic,
    );

    let file = File::create(&out_path)?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    info!("report written to {}", out_path.display());
    Ok(out_path)
}

fn add_font(
    doc: &printpdf::PdfDocumentReference,
    font: BuiltinFont,
) -> Result<IndirectFontRef, ReportError> {
    doc.add_builtin_font(font)
        .map_err(|e| ReportError::Pdf(e.to_string()))
}

fn label_color(accent: AccentColor) -> Color {
    match accent {
        AccentColor::Red => Color::Rgb(Rgb::new(1.0, 0.0, 0.0, None)),
        AccentColor::Green => Color::Rgb(Rgb::new(0.0, 0.5, 0.0, None)),
    }
}

fn text_width_mm(text: &str, font_size_pt: f64) -> f64 {
    text.chars().count() as f64 * AVG_ADVANCE_EM * font_size_pt * MM_PER_PT
}

/// `y_from_top` is measured from the page top; printpdf measures from the
/// bottom-left corner.
fn text_left(
    layer: &PdfLayerReference,
    text: &str,
    size: f64,
    y_from_top: f64,
    font: &IndirectFontRef,
) {
    layer.use_text(text, size, Mm(PAGE_MARGIN), Mm(PAGE_HEIGHT - y_from_top), font);
}

fn text_centered(
    layer: &PdfLayerReference,
    text: &str,
    size: f64,
    y_from_top: f64,
    font: &IndirectFontRef,
) {
    text_centered_at(layer, text, size, y_from_top, PAGE_WIDTH / 2.0, font);
}

fn text_centered_at(
    layer: &PdfLayerReference,
    text: &str,
    size: f64,
    y_from_top: f64,
    center_x: f64,
    font: &IndirectFontRef,
) {
    let x = (center_x - text_width_mm(text, size) / 2.0).max(PAGE_MARGIN);
    layer.use_text(text, size, Mm(x), Mm(PAGE_HEIGHT - y_from_top), font);
}

/// Embeds the image scaled to `width_mm`, top edge at `top_mm` from the page
/// top. Returns the rendered height.
fn embed_image(
    layer: &PdfLayerReference,
    path: &Path,
    x_mm: f64,
    top_mm: f64,
    width_mm: f64,
) -> Result<f64, ReportError> {
    let decoded = printpdf::image_crate::open(path).map_err(|e| ReportError::Image {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let image = Image::from_dynamic_image(&decoded);

    let px_width = image.image.width.0 as f64;
    let px_height = image.image.height.0 as f64;
    let native_width_mm = px_width * 25.4 / EMBED_DPI;
    let native_height_mm = px_height * 25.4 / EMBED_DPI;
    let scale = width_mm / native_width_mm;
    let height_mm = native_height_mm * scale;

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x_mm)),
            translate_y: Some(Mm(PAGE_HEIGHT - top_mm - height_mm)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            ..Default::default()
        },
    );
    Ok(height_mm)
}

fn wrap_text(text: &str, font_size_pt: f64, max_width_mm: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width_mm(&candidate, font_size_pt) > max_width_mm && !current.is_empty() {
            lines.push(current);
            current = word.to_string();
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{Rgb, RgbImage};
use ndarray::Array4;

use engine::{
    Analysis, AnalysisEngine, AnalysisError, Classifier, EngineConfig, InferenceError, ModelSet,
    RiskLabel,
};

/// Classifier stub returning a fixed score, standing in for the TorchScript
/// modules so the pipeline runs without model weights.
struct FixedScore {
    input_size: (u32, u32),
    score: f32,
}

impl Classifier for FixedScore {
    fn input_size(&self) -> (u32, u32) {
        self.input_size
    }

    fn score(&self, input: &Array4<f32>) -> Result<f32, InferenceError> {
        let (batch, height, width, channels) = input.dim();
        assert_eq!(batch, 1);
        assert_eq!(channels, 3);
        assert_eq!((width as u32, height as u32), self.input_size);
        Ok(self.score)
    }
}

fn temp_root() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mr-engine-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_scan(dir: &Path, name: &str) -> PathBuf {
    let mut img = RgbImage::new(40, 30);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgb([(x * 6 % 256) as u8, (y * 8 % 256) as u8, 90]);
    }
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

fn engine_with(validity: f32, risk: f32, root: &Path) -> AnalysisEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = EngineConfig {
        results_dir: root.join("results"),
        reports_dir: root.join("reports"),
        ..Default::default()
    };
    let models = ModelSet {
        validator: Arc::new(FixedScore {
            input_size: (128, 128),
            score: validity,
        }),
        risk: Arc::new(FixedScore {
            input_size: (224, 224),
            score: risk,
        }),
    };
    AnalysisEngine::with_models(Some(models), config)
}

#[test]
fn high_risk_scan_produces_full_artifact_set() {
    let root = temp_root();
    let scan = write_scan(&root, "scan.png");
    let engine = engine_with(0.9, 0.82, &root);

    let analysis = engine.analyze(&scan).unwrap();
    let completed = match analysis {
        Analysis::Completed(c) => c,
        other => panic!("expected completed analysis, got {other:?}"),
    };

    assert!(completed.result.is_valid_modality);
    assert!((completed.result.risk_percent - 82.0).abs() < 1e-4);
    assert_eq!(completed.result.risk_label, RiskLabel::HighRisk);
    assert_eq!(completed.result.accent_color.code(), "red");

    // Annotated derivative: same dimensions, next to the results dir.
    assert_eq!(
        completed.processed_path,
        root.join("results").join("processed_scan.png")
    );
    assert_eq!(
        image::image_dimensions(&completed.processed_path).unwrap(),
        (40, 30)
    );

    // Report: a real PDF under the reports dir.
    assert_eq!(
        completed.pdf_path,
        root.join("reports").join("report_scan.png.pdf")
    );
    let pdf_bytes = std::fs::read(&completed.pdf_path).unwrap();
    assert!(pdf_bytes.starts_with(b"%PDF"));

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn success_payload_carries_all_fields_and_no_message() {
    let root = temp_root();
    let scan = write_scan(&root, "scan.jpg");
    let engine = engine_with(0.9, 0.82, &root);

    let response = engine.analyze(&scan).unwrap().into_response();
    assert!(response.success);
    assert_eq!(response.risk_score, Some(82.0));
    assert_eq!(
        response.risk_label.as_deref(),
        Some("YÜKSEK RİSK (TÜMÖR ŞÜPHESİ)")
    );
    assert_eq!(response.color_code.as_deref(), Some("red"));
    assert!(response.message.is_none());

    let json = serde_json::to_value(&response).unwrap();
    assert!(json.get("message").is_none());
    assert_eq!(json["risk_score"], 82.0);

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn invalid_modality_is_rejected_without_artifacts() {
    let root = temp_root();
    let scan = write_scan(&root, "holiday_photo.png");
    let engine = engine_with(0.2, 0.99, &root);

    let analysis = engine.analyze(&scan).unwrap();
    match &analysis {
        Analysis::Rejected {
            validity_confidence,
            message,
        } => {
            assert!((validity_confidence - 0.2).abs() < 1e-6);
            assert!(message.contains("20.0"));
            assert!(message.contains("yükleyin"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }

    // The gate is hard: nothing downstream may have run.
    assert!(!root.join("results").exists());
    assert!(!root.join("reports").exists());

    let response = analysis.into_response();
    assert!(!response.success);
    assert!(response.message.is_some());
    assert!(response.risk_score.is_none());

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn borderline_confidence_message_keeps_precision() {
    let root = temp_root();
    let scan = write_scan(&root, "scan.png");
    let engine = engine_with(0.4999, 0.1, &root);

    match engine.analyze(&scan).unwrap() {
        Analysis::Rejected { message, .. } => assert!(message.contains("49.99")),
        other => panic!("expected rejection, got {other:?}"),
    }

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn exact_threshold_confidence_passes_the_gate() {
    let root = temp_root();
    let scan = write_scan(&root, "scan.png");
    let engine = engine_with(0.5, 0.3, &root);

    match engine.analyze(&scan).unwrap() {
        Analysis::Completed(completed) => {
            assert!((completed.result.validity_confidence - 0.5).abs() < 1e-6);
        }
        other => panic!("expected completed analysis, got {other:?}"),
    }

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn exactly_half_risk_maps_to_low_risk() {
    let root = temp_root();
    let scan = write_scan(&root, "scan.png");
    let engine = engine_with(0.9, 0.5, &root);

    match engine.analyze(&scan).unwrap() {
        Analysis::Completed(completed) => {
            assert!((completed.result.risk_percent - 50.0).abs() < 1e-4);
            assert_eq!(completed.result.risk_label, RiskLabel::LowRisk);
            assert_eq!(completed.result.accent_color.code(), "green");
        }
        other => panic!("expected completed analysis, got {other:?}"),
    }

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn unavailable_models_short_circuit_every_request() {
    let root = temp_root();
    let scan = write_scan(&root, "scan.png");
    let config = EngineConfig {
        results_dir: root.join("results"),
        reports_dir: root.join("reports"),
        ..Default::default()
    };
    let engine = AnalysisEngine::with_models(None, config);
    assert!(!engine.is_available());

    let err = engine.analyze(&scan).unwrap_err();
    assert!(matches!(err, AnalysisError::ModelUnavailable));
    assert!(err.user_message().contains("AI modelleri"));

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn undecodable_input_surfaces_as_decode_failure() {
    let root = temp_root();
    let bogus = root.join("scan.png");
    std::fs::write(&bogus, b"plain text, no pixels").unwrap();
    let engine = engine_with(0.9, 0.9, &root);

    let err = engine.analyze(&bogus).unwrap_err();
    assert!(matches!(err, AnalysisError::Decode { .. }));

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn reanalysis_of_identical_input_is_deterministic() {
    let root = temp_root();
    let scan = write_scan(&root, "scan.png");
    let engine = engine_with(0.9, 0.73, &root);

    let first = match engine.analyze(&scan).unwrap() {
        Analysis::Completed(c) => c.result,
        other => panic!("expected completed analysis, got {other:?}"),
    };
    let second = match engine.analyze(&scan).unwrap() {
        Analysis::Completed(c) => c.result,
        other => panic!("expected completed analysis, got {other:?}"),
    };
    assert_eq!(first, second);

    let _ = std::fs::remove_dir_all(&root);
}

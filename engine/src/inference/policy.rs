/// Categorical outcome of the risk classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLabel {
    HighRisk,
    LowRisk,
}

impl RiskLabel {
    pub fn display(&self) -> &'static str {
        match self {
            RiskLabel::HighRisk => "YÜKSEK RİSK (TÜMÖR ŞÜPHESİ)",
            RiskLabel::LowRisk => "DÜŞÜK RİSK (TEMİZ)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccentColor {
    Red,
    Green,
}

impl AccentColor {
    /// Wire value consumed by the web layer.
    pub fn code(&self) -> &'static str {
        match self {
            AccentColor::Red => "red",
            AccentColor::Green => "green",
        }
    }

    /// Pure accent color used for the image overlay.
    pub fn overlay_rgb(&self) -> (u8, u8, u8) {
        match self {
            AccentColor::Red => (255, 0, 0),
            AccentColor::Green => (0, 255, 0),
        }
    }
}

/// Maps the display percentage to a label and accent color. The threshold is
/// a strict greater-than on the percent value: exactly 50.00 is low risk.
pub fn classify_risk(risk_percent: f32) -> (RiskLabel, AccentColor) {
    if risk_percent > 50.0 {
        (RiskLabel::HighRisk, AccentColor::Red)
    } else {
        (RiskLabel::LowRisk, AccentColor::Green)
    }
}

use serde::{Deserialize, Serialize};

/// Exposure level bands; edges 2, 5, 7 and 10 belong to the lower band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UvLevel {
    #[serde(rename = "Bajo")]
    Low,
    #[serde(rename = "Moderado")]
    Moderate,
    #[serde(rename = "Alto")]
    High,
    #[serde(rename = "Muy Alto")]
    VeryHigh,
    #[serde(rename = "Extremo")]
    Extreme,
}

/// Health risk, one step below the exposure level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Mínimo")]
    Minimal,
    #[serde(rename = "Bajo")]
    Low,
    #[serde(rename = "Moderado")]
    Moderate,
    #[serde(rename = "Alto")]
    High,
    #[serde(rename = "Muy Alto")]
    VeryHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub level: UvLevel,
    pub color: &'static str,
    pub risk: RiskLevel,
}

impl UvLevel {
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            UvLevel::Low => "#28a745",
            UvLevel::Moderate => "#ffc107",
            UvLevel::High => "#fd7e14",
            UvLevel::VeryHigh => "#dc3545",
            UvLevel::Extreme => "#6f42c1",
        }
    }

    #[must_use]
    pub fn risk(self) -> RiskLevel {
        match self {
            UvLevel::Low => RiskLevel::Minimal,
            UvLevel::Moderate => RiskLevel::Low,
            UvLevel::High => RiskLevel::Moderate,
            UvLevel::VeryHigh => RiskLevel::High,
            UvLevel::Extreme => RiskLevel::VeryHigh,
        }
    }

    /// Spanish display label, as serialized
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            UvLevel::Low => "Bajo",
            UvLevel::Moderate => "Moderado",
            UvLevel::High => "Alto",
            UvLevel::VeryHigh => "Muy Alto",
            UvLevel::Extreme => "Extremo",
        }
    }
}

/// Map a UV index onto its band. Total: anything above 10 (or NaN) is Extreme.
#[must_use]
pub fn classify(index: f64) -> Classification {
    let level = if index <= 2.0 {
        UvLevel::Low
    } else if index <= 5.0 {
        UvLevel::Moderate
    } else if index <= 7.0 {
        UvLevel::High
    } else if index <= 10.0 {
        UvLevel::VeryHigh
    } else {
        UvLevel::Extreme
    };

    Classification {
        level,
        color: level.color(),
        risk: level.risk(),
    }
}

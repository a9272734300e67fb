//! Measured and estimated values, forecast points and alerts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// UV index with provenance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UvReading {
    pub index: f64,
    /// `true` when the value came from a provider rather than the estimator
    pub source_is_real: bool,
}

/// Solar radiation with provenance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadiationReading {
    /// Irradiance in W/m²
    pub watts_per_m2: f64,
    pub source_is_real: bool,
}

/// One hourly UV prediction, serialized the way the realtime provider sends it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    #[serde(rename = "time")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "uvi")]
    pub uv_index: f64,
}

/// Location name and UV value harvested from the backup page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    #[serde(rename = "ciudad")]
    pub name: String,
    #[serde(rename = "uv")]
    pub value: f64,
}

impl Observation {
    #[must_use]
    pub fn new<S: Into<String>>(name: S, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Error,
    Warning,
    Info,
    Success,
}

/// Per-request notice attached to a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    #[serde(rename = "tipo")]
    pub kind: AlertKind,
    #[serde(rename = "mensaje")]
    pub message: String,
    #[serde(rename = "detalle")]
    pub detail: String,
}

impl Alert {
    pub fn new<M: Into<String>, D: Into<String>>(kind: AlertKind, message: M, detail: D) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: detail.into(),
        }
    }

    pub fn warning<M: Into<String>, D: Into<String>>(message: M, detail: D) -> Self {
        Self::new(AlertKind::Warning, message, detail)
    }

    pub fn error<M: Into<String>, D: Into<String>>(message: M, detail: D) -> Self {
        Self::new(AlertKind::Error, message, detail)
    }
}

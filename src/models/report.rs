//! Normalized `/radiacion` result record

use super::{Alert, ForecastPoint, RadiationReading, UvReading};
use crate::uv::{Classification, RiskLevel, UvLevel};
use serde::Serialize;

pub const RADIATION_UNIT: &str = "W/m²";

/// How the UV value of a report was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Precision {
    #[serde(rename = "Alta (datos en tiempo real)")]
    Realtime,
    #[serde(rename = "Media (datos SENAMHI)")]
    Backup,
    #[serde(rename = "Media (estimación)")]
    Estimated,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportCoordinates {
    pub lat: f64,
    pub lng: f64,
    /// Meters, rounded
    pub altitud: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UvSection {
    pub indice: f64,
    pub nivel: UvLevel,
    pub riesgo: RiskLevel,
    pub color: &'static str,
    pub fuente_real: bool,
}

impl UvSection {
    #[must_use]
    pub fn new(reading: UvReading, classification: Classification) -> Self {
        Self {
            indice: reading.index,
            nivel: classification.level,
            riesgo: classification.risk,
            color: classification.color,
            fuente_real: reading.source_is_real,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadiationSection {
    /// Whole W/m²
    pub valor: i64,
    pub unidad: &'static str,
    pub fuente_real: bool,
}

impl From<RadiationReading> for RadiationSection {
    fn from(reading: RadiationReading) -> Self {
        Self {
            valor: reading.watts_per_m2.round() as i64,
            unidad: RADIATION_UNIT,
            fuente_real: reading.source_is_real,
        }
    }
}

/// Complete answer for one coordinate; also the cached payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadiationReport {
    #[serde(rename = "coordenadas")]
    pub coordinates: ReportCoordinates,
    pub uv: UvSection,
    #[serde(rename = "radiacion_solar")]
    pub radiation: RadiationSection,
    /// Next hours from the realtime provider, `null` when it did not answer
    pub forecast: Option<Vec<ForecastPoint>>,
    #[serde(rename = "fuentes_datos")]
    pub sources: Vec<String>,
    pub precision: Precision,
    #[serde(rename = "alertas")]
    pub alerts: Vec<Alert>,
    /// `HH:MM:SS` in the region's timezone
    #[serde(rename = "hora_local")]
    pub local_time: String,
    /// RFC 3339 UTC with milliseconds
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uv::classify;

    #[test]
    fn test_report_field_names() {
        let report = RadiationReport {
            coordinates: ReportCoordinates {
                lat: -12.0464,
                lng: -77.0428,
                altitud: 100,
            },
            uv: UvSection::new(
                UvReading {
                    index: 7.2,
                    source_is_real: true,
                },
                classify(7.2),
            ),
            radiation: RadiationReading {
                watts_per_m2: 648.0,
                source_is_real: true,
            }
            .into(),
            forecast: None,
            sources: vec!["CurrentUVIndex API (tiempo real)".to_string()],
            precision: Precision::Realtime,
            alerts: vec![],
            local_time: "14:00:00".to_string(),
            timestamp: "2026-03-10T19:00:00.000Z".to_string(),
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["coordenadas"]["altitud"], 100);
        assert_eq!(json["uv"]["nivel"], "Alto");
        assert_eq!(json["uv"]["riesgo"], "Moderado");
        assert_eq!(json["uv"]["color"], "#fd7e14");
        assert_eq!(json["radiacion_solar"]["valor"], 648);
        assert_eq!(json["radiacion_solar"]["unidad"], "W/m²");
        assert!(json["forecast"].is_null());
        assert_eq!(json["precision"], "Alta (datos en tiempo real)");
        assert_eq!(json["hora_local"], "14:00:00");
        assert!(json["alertas"].as_array().unwrap().is_empty());
    }
}

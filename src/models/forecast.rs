//! Hourly and daily UV forecast breakdown served by `/pronostico`

use super::ForecastPoint;
use crate::clock::region_time;
use crate::models::Coordinate;
use crate::uv::{UvLevel, classify};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Hours listed in `pronostico_horas`
pub const FORECAST_HOURS: usize = 24;

pub const FORECAST_SOURCE: &str = "CurrentUVIndex API";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastCoordinates {
    pub lat: f64,
    pub lng: f64,
}

/// One forecast hour in local time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyUv {
    /// `HH:MM`
    pub hora: String,
    /// `DD/MM`
    pub fecha: String,
    pub uv: f64,
    pub nivel: UvLevel,
    pub color: &'static str,
}

impl HourlyUv {
    #[must_use]
    pub fn from_point(point: &ForecastPoint) -> Self {
        let local = region_time(point.timestamp);
        let classification = classify(point.uv_index);
        Self {
            hora: local.format("%H:%M").to_string(),
            fecha: local.format("%d/%m").to_string(),
            uv: point.uv_index,
            nivel: classification.level,
            color: classification.color,
        }
    }
}

/// Local calendar day with its peak index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyUv {
    pub fecha: String,
    pub uv_maximo: f64,
    pub horas: Vec<HourlyUv>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastReport {
    #[serde(rename = "coordenadas")]
    pub coordinates: ForecastCoordinates,
    pub uv_actual: f64,
    pub pronostico_horas: Vec<HourlyUv>,
    pub pronostico_dias: Vec<DailyUv>,
    pub fuente: &'static str,
    pub timestamp: String,
}

impl ForecastReport {
    /// Build the breakdown; days keep the order in which they first appear
    #[must_use]
    pub fn new(
        coordinate: Coordinate,
        current_uv: f64,
        forecast: &[ForecastPoint],
        generated_at: DateTime<Utc>,
    ) -> Self {
        let hours: Vec<HourlyUv> = forecast.iter().map(HourlyUv::from_point).collect();

        let mut days: Vec<DailyUv> = Vec::new();
        for hour in &hours {
            match days.iter_mut().find(|d| d.fecha == hour.fecha) {
                Some(day) => {
                    day.uv_maximo = day.uv_maximo.max(hour.uv);
                    day.horas.push(hour.clone());
                }
                None => days.push(DailyUv {
                    fecha: hour.fecha.clone(),
                    uv_maximo: hour.uv.max(0.0),
                    horas: vec![hour.clone()],
                }),
            }
        }

        Self {
            coordinates: ForecastCoordinates {
                lat: coordinate.latitude,
                lng: coordinate.longitude,
            },
            uv_actual: current_uv,
            pronostico_horas: hours.into_iter().take(FORECAST_HOURS).collect(),
            pronostico_dias: days,
            fuente: FORECAST_SOURCE,
            timestamp: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

use axum::{Json, extract::State};
use chrono::SecondsFormat;
use serde::Serialize;
use serde_json::{Value, json};

use super::AppState;
use super::error::ApiError;
use super::params::{ApiQuery, CoordinateQuery};
use crate::models::{ForecastReport, RadiationReport};
use crate::reconciler::{PROBE_COORDINATE, RadiationRequest};

const RADIATION_EXAMPLE: &str = "/radiacion?lat=-12.0464&lng=-77.0428";
const FORECAST_EXAMPLE: &str = "/pronostico?lat=-12.0464&lng=-77.0428";

/// Backup cities shown by the diagnostics endpoint
const PROBE_CITY_SAMPLE: usize = 3;

/// `/radiacion` body: the stored record, plus cache annotations on a hit
#[derive(Debug, Serialize)]
pub struct RadiationResponse {
    #[serde(flatten)]
    pub report: RadiationReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desde_cache: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_edad_minutos: Option<i64>,
}

pub async fn radiacion(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CoordinateQuery>,
) -> Result<Json<RadiationResponse>, ApiError> {
    let coordinate = query.coordinate(RADIATION_EXAMPLE, true)?;
    let request = RadiationRequest {
        coordinate,
        altitude_m: query.altitude(),
    };

    let resolution = state.service.radiation(request).await;
    Ok(Json(RadiationResponse {
        report: resolution.report,
        desde_cache: resolution.cache_age_minutes.map(|_| true),
        cache_edad_minutos: resolution.cache_age_minutes,
    }))
}

pub async fn pronostico(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CoordinateQuery>,
) -> Result<Json<ForecastReport>, ApiError> {
    let coordinate = query.coordinate(FORECAST_EXAMPLE, false)?;
    let report = state
        .service
        .forecast(coordinate)
        .await
        .map_err(|e| ApiError::from_uv(e, state.production))?;
    Ok(Json(report))
}

/// Probe both providers and suggest which path requests will take
pub async fn test_providers(State(state): State<AppState>) -> Json<Value> {
    let probe = state.service.probe().await;
    let realtime_ok = probe.realtime.data.is_some();
    let backup_ok = probe.backup.data.is_some();

    let currentuvindex = json!({
        "estado": if realtime_ok { "Funcionando ✅" } else { "Sin datos ⚠️" },
        "tiempo_respuesta": format!("{}ms", probe.realtime.elapsed.as_millis()),
        "datos": probe.realtime.data.as_ref().map(|reading| json!({
            "uv_actual": reading.current.uv_index,
            "uv_maximo_hoy": reading.today_max,
            "pronostico_horas": reading.forecast.len(),
        })),
    });

    let senamhi_backup = match &probe.backup.data {
        Some(observations) => json!({
            "estado": format!("Funcionando ✅ ({} ciudades)", observations.len()),
            "tiempo_respuesta": format!("{}ms", probe.backup.elapsed.as_millis()),
            "ciudades": observations.iter().take(PROBE_CITY_SAMPLE).collect::<Vec<_>>(),
        }),
        None => json!({
            "estado": "Sin datos ⚠️",
            "tiempo_respuesta": format!("{}ms", probe.backup.elapsed.as_millis()),
            "ciudades": [],
        }),
    };

    let recomendacion = if realtime_ok {
        "✅ Sistema funcionando correctamente con API principal"
    } else if backup_ok {
        "⚠️ API principal no disponible, usando backup SENAMHI"
    } else {
        "❌ Todas las APIs externas no disponibles, usando cálculos estimados"
    };

    Json(json!({
        "timestamp": state.service.clock().now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "coordenadas_prueba": {
            "lat": PROBE_COORDINATE.latitude,
            "lng": PROBE_COORDINATE.longitude,
        },
        "currentuvindex": currentuvindex,
        "senamhi_backup": senamhi_backup,
        "cache": state.cache_summary(),
        "recomendacion": recomendacion,
    }))
}

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::SecondsFormat;
use serde_json::{Value, json};
use tower_http::catch_panic::CatchPanicLayer;

use crate::reconciler::UvService;

pub mod error;
pub mod params;
pub mod uv;

pub use error::ApiError;
pub use params::{ApiQuery, CoordinateQuery};

const ENDPOINTS: [&str; 6] = [
    "GET /",
    "GET /radiacion?lat=X&lng=Y",
    "GET /pronostico?lat=X&lng=Y",
    "GET /test",
    "POST /cache/clear",
    "GET /status",
];

/// Shared handler state; cheap to clone
#[derive(Clone, Debug)]
pub struct AppState {
    pub service: Arc<UvService>,
    pub started_at: Instant,
    /// Hides internal error details from responses
    pub production: bool,
}

impl AppState {
    pub fn new(service: Arc<UvService>, production: bool) -> Self {
        Self {
            service,
            started_at: Instant::now(),
            production,
        }
    }

    /// Entry count and TTL, as shown by the informational endpoints
    pub(crate) fn cache_summary(&self) -> Value {
        let cache = self.service.cache();
        json!({
            "entradas": cache.len(),
            "duracion_minutos": cache.ttl().num_minutes(),
        })
    }

    fn timestamp(&self) -> String {
        self.service
            .clock()
            .now()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

pub fn router(state: AppState) -> Router {
    let production = state.production;

    Router::new()
        .route("/", get(info))
        .route("/radiacion", get(uv::radiacion))
        .route("/pronostico", get(uv::pronostico))
        .route("/test", get(uv::test_providers))
        .route("/cache/clear", post(clear_cache))
        .route("/status", get(status))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(CatchPanicLayer::custom(move |panic: Box<dyn Any + Send>| {
            panic_response(panic.as_ref(), production)
        }))
        .with_state(state)
}

fn panic_response(panic: &(dyn Any + Send), production: bool) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| (*s).to_string()))
        .unwrap_or_else(|| "handler panicked".to_string());
    ApiError::internal(detail, production).into_response()
}

async fn info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "nombre": "API de Radiación UV con datos en tiempo real",
        "descripcion": "Consulta radiación UV usando CurrentUVIndex API (sin key) y SENAMHI como backup",
        "version": crate::VERSION,
        "fuentes_datos": [
            "CurrentUVIndex API (principal - tiempo real)",
            "SENAMHI Web (backup - índice UV)",
            "Cálculos propios (fallback)",
        ],
        "uso": "GET /radiacion?lat=LATITUD&lng=LONGITUD",
        "ejemplo": "/radiacion?lat=-12.0464&lng=-77.0428",
        "endpoints": {
            "GET /": "Información de la API",
            "GET /radiacion": "Consultar radiación UV por coordenadas",
            "GET /pronostico": "Pronóstico UV para las próximas horas/días",
            "GET /test": "Probar conexión con las APIs",
            "POST /cache/clear": "Limpiar cache",
            "GET /status": "Estado del servidor",
        },
        "cache": state.cache_summary(),
        "timestamp": state.timestamp(),
    }))
}

async fn clear_cache(State(state): State<AppState>) -> Json<Value> {
    let removed = state.service.cache().clear();
    Json(json!({
        "mensaje": "Cache limpiado exitosamente",
        "entradas_eliminadas": removed,
        "timestamp": state.timestamp(),
    }))
}

async fn status(State(state): State<AppState>) -> Json<Value> {
    let uptime = state.started_at.elapsed().as_secs();

    Json(json!({
        "estado": "Funcionando ✅",
        "uptime": {
            "segundos": uptime,
            "formato": format_uptime(uptime),
        },
        "memoria": {
            "residente_mb": resident_memory_mb(),
        },
        "cache": state.cache_summary(),
        "version": crate::VERSION,
        "timestamp": state.timestamp(),
    }))
}

async fn not_found(method: Method, uri: Uri) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Endpoint no encontrado",
            "ruta_solicitada": uri.to_string(),
            "metodo": method.as_str(),
            "endpoints_disponibles": ENDPOINTS,
            "ejemplo": "/radiacion?lat=-12.0464&lng=-77.0428",
        })),
    )
}

fn format_uptime(seconds: u64) -> String {
    format!(
        "{}h {}m {}s",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Resident set size from `/proc/self/status`, `None` where unavailable
fn resident_memory_mb() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_vm_rss_kb(&status).map(|kb| (kb + 512) / 1024)
}

fn parse_vm_rss_kb(status: &str) -> Option<u64> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("VmRSS:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|kb| kb.parse().ok())
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};

use crate::UvError;

const INTERNAL_ERROR: &str = "Error interno del servidor";
const INTERNAL_MESSAGE: &str = "No se pudo procesar la solicitud";

/// Endpoint-level failures, rendered as `{error, ...context}` JSON
#[derive(Debug)]
pub enum ApiError {
    /// `lat`/`lng` absent; the body shows a usage example
    MissingCoordinates {
        example: &'static str,
        with_format: bool,
    },
    /// A parameter failed parsing or range validation
    InvalidParameter { message: String, received: Value },
    ServiceUnavailable,
    /// `detail` is only rendered outside production
    Internal { detail: Option<String> },
}

impl ApiError {
    pub fn internal(detail: impl Into<String>, production: bool) -> Self {
        let detail = detail.into();
        tracing::error!("Internal error: {detail}");
        Self::Internal {
            detail: (!production).then_some(detail),
        }
    }

    /// Map a domain error; anything unexpected becomes a 500
    pub fn from_uv(error: UvError, production: bool) -> Self {
        match error {
            UvError::Validation { message } => Self::InvalidParameter {
                message,
                received: Value::Null,
            },
            UvError::ServiceUnavailable { message } => {
                tracing::warn!("Service unavailable: {message}");
                Self::ServiceUnavailable
            }
            other => Self::internal(other.to_string(), production),
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingCoordinates { .. } | ApiError::InvalidParameter { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        match self {
            ApiError::MissingCoordinates {
                example,
                with_format,
            } => {
                let mut body = json!({
                    "error": "Parámetros requeridos: lat y lng",
                    "ejemplo": example,
                });
                if *with_format {
                    body["formato"] = json!({
                        "lat": "Latitud en grados decimales (-90 a 90)",
                        "lng": "Longitud en grados decimales (-180 a 180)",
                        "altitude": "Altitud en metros (opcional)",
                    });
                }
                body
            }
            ApiError::InvalidParameter { message, received } => json!({
                "error": message,
                "recibido": received,
            }),
            ApiError::ServiceUnavailable => json!({
                "error": "No se pudo obtener el pronóstico",
                "mensaje": "El servicio de pronóstico no está disponible en este momento",
            }),
            ApiError::Internal { detail } => {
                let mut body = json!({
                    "error": INTERNAL_ERROR,
                    "mensaje": INTERNAL_MESSAGE,
                    "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                });
                if let Some(detail) = detail {
                    body["detalle"] = Value::String(detail.clone());
                }
                body
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from_uv(UvError::validation("bad"), true).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from_uv(UvError::unavailable("down"), true).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from_uv(UvError::internal("boom"), true).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_hidden_in_production() {
        let body = ApiError::internal("boom", true).body();
        assert!(body.get("detalle").is_none());
        assert_eq!(body["mensaje"], INTERNAL_MESSAGE);

        let body = ApiError::internal("boom", false).body();
        assert_eq!(body["detalle"], "boom");
    }

    #[test]
    fn test_missing_coordinates_body() {
        let body = ApiError::MissingCoordinates {
            example: "/pronostico?lat=-12.0464&lng=-77.0428",
            with_format: false,
        }
        .body();
        assert_eq!(body["ejemplo"], "/pronostico?lat=-12.0464&lng=-77.0428");
        assert!(body.get("formato").is_none());
    }
}

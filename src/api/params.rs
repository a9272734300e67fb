use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;
use crate::models::Coordinate;

/// `Query` extractor whose rejection renders as an `ApiError` body
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::InvalidParameter {
                message: format!("Parámetros de consulta inválidos: {}", rejection.body_text()),
                received: parts
                    .uri
                    .query()
                    .map_or(Value::Null, |query| Value::String(query.to_string())),
            }),
        }
    }
}

/// Raw query string; values stay strings so bad input can be echoed back
#[derive(Debug, Default, Deserialize)]
pub struct CoordinateQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub altitude: Option<String>,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Parse one coordinate component, echoing the raw text when it is not a number
fn parse_component(
    raw: &str,
    validate: fn(f64) -> Result<f64, crate::UvError>,
) -> Result<f64, ApiError> {
    let parsed = raw.parse::<f64>().ok();
    let value = parsed.unwrap_or(f64::NAN);

    validate(value).map_err(|e| ApiError::InvalidParameter {
        message: e.user_message(),
        received: parsed
            .and_then(serde_json::Number::from_f64)
            .map_or_else(|| Value::String(raw.to_string()), Value::Number),
    })
}

impl CoordinateQuery {
    /// Validated coordinate; `example` is shown when a parameter is missing
    pub fn coordinate(&self, example: &'static str, with_format: bool) -> Result<Coordinate, ApiError> {
        let (Some(lat), Some(lng)) = (present(self.lat.as_ref()), present(self.lng.as_ref())) else {
            return Err(ApiError::MissingCoordinates {
                example,
                with_format,
            });
        };

        let latitude = parse_component(lat, Coordinate::validate_latitude)?;
        let longitude = parse_component(lng, Coordinate::validate_longitude)?;
        Ok(Coordinate {
            latitude,
            longitude,
        })
    }

    /// Caller altitude in meters; unparseable values count as absent
    #[must_use]
    pub fn altitude(&self) -> Option<f64> {
        present(self.altitude.as_ref())
            .and_then(|raw| raw.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }
}

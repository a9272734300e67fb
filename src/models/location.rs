//! Coordinate model, range validation and cache key derivation

use crate::UvError;
use serde::{Deserialize, Serialize};

/// Decimal places kept when deriving cache keys
pub const CACHE_KEY_PRECISION: u32 = 4;

/// Geographic coordinate in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees, -90..=90
    pub latitude: f64,
    /// Longitude in decimal degrees, -180..=180
    pub longitude: f64,
}

impl Coordinate {
    /// Create a validated coordinate
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, UvError> {
        Ok(Self {
            latitude: Self::validate_latitude(latitude)?,
            longitude: Self::validate_longitude(longitude)?,
        })
    }

    /// Coordinate for static tables; callers guarantee the range
    #[must_use]
    pub const fn fixed(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn validate_latitude(latitude: f64) -> Result<f64, UvError> {
        if (-90.0..=90.0).contains(&latitude) {
            Ok(latitude)
        } else {
            Err(UvError::validation("Latitud debe estar entre -90 y 90 grados"))
        }
    }

    pub fn validate_longitude(longitude: f64) -> Result<f64, UvError> {
        if (-180.0..=180.0).contains(&longitude) {
            Ok(longitude)
        } else {
            Err(UvError::validation(
                "Longitud debe estar entre -180 y 180 grados",
            ))
        }
    }

    /// Round coordinates to the given number of decimal places
    #[must_use]
    pub fn rounded_coordinates(&self, precision: u32) -> (f64, f64) {
        let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(4));
        let lat = (self.latitude * multiplier).round() / multiplier;
        let lon = (self.longitude * multiplier).round() / multiplier;
        (lat, lon)
    }

    /// Cache key shared by every request that rounds to the same 4-decimal point
    #[must_use]
    pub fn cache_key(&self) -> String {
        let (lat, lon) = self.rounded_coordinates(CACHE_KEY_PRECISION);
        format!("{lat:.4}_{lon:.4}")
    }

    /// Euclidean distance in degree space (flat-earth, short range only)
    #[must_use]
    pub fn degree_distance(&self, other: &Coordinate) -> f64 {
        let d_lat = other.latitude - self.latitude;
        let d_lon = other.longitude - self.longitude;
        (d_lat * d_lat + d_lon * d_lon).sqrt()
    }
}

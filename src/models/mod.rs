//! Data models for the UV radiation service
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates and cache keys
//! - Reading: Measured or estimated values, forecast points and alerts
//! - Report: The normalized `/radiacion` record
//! - Forecast: Hourly and daily `/pronostico` breakdown

pub mod forecast;
pub mod location;
pub mod reading;
pub mod report;

// Re-export all public types for convenient access
pub use forecast::{DailyUv, ForecastReport, HourlyUv};
pub use location::Coordinate;
pub use reading::{Alert, AlertKind, ForecastPoint, Observation, RadiationReading, UvReading};
pub use report::{Precision, RadiationReport, RadiationSection, ReportCoordinates, UvSection};

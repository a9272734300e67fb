//! Heuristic UV index and solar radiation estimates
//!
//! Used only when no provider returns usable data. Both formulas are crude
//! approximations built from hour, season, latitude and altitude factors; the
//! UV and radiation estimates are parameterized independently and are not
//! numerically consistent with each other.

use crate::clock::region_time;
use crate::models::Coordinate;
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::f64::consts::PI;

const UV_BASE: f64 = 12.0;
const RADIATION_BASE_W_M2: f64 = 800.0;

/// Sunrise-to-sunset bell curve, zero outside roughly 06:00-18:00
fn hour_factor(hour: f64) -> f64 {
    (PI * (hour - 6.0) / 12.0).sin().max(0.0)
}

/// Estimate the UV index at `at`, rounded to one decimal, never negative
#[must_use]
pub fn estimate_uv(coordinate: &Coordinate, altitude_m: f64, at: DateTime<Utc>) -> f64 {
    let local = region_time(at);
    let hour = f64::from(local.hour());
    let month = f64::from(local.month());
    let day_of_year = f64::from(local.ordinal());

    let latitude_factor = 1.0 - (coordinate.latitude.abs() / 90.0) * 0.4;
    let altitude_factor = 1.0 + (altitude_m / 1000.0) * 0.15;
    // Anchored on December, southern-hemisphere summer
    let month_factor = 1.0 + 0.3 * (2.0 * PI * (month - 12.0) / 12.0).cos();
    let day_of_year_factor = 1.0 + 0.1 * (2.0 * PI * day_of_year / 365.0).sin();
    // Midday haze
    let cloudiness_factor = if (10..=16).contains(&local.hour()) {
        0.9
    } else {
        1.0
    };

    let uv = UV_BASE
        * latitude_factor
        * altitude_factor
        * hour_factor(hour)
        * month_factor
        * day_of_year_factor
        * cloudiness_factor;

    (uv.max(0.0) * 10.0).round() / 10.0
}

/// Estimate global solar radiation in W/m², rounded to a whole number
#[must_use]
pub fn estimate_radiation(coordinate: &Coordinate, altitude_m: f64, at: DateTime<Utc>) -> f64 {
    let local = region_time(at);
    let hour = f64::from(local.hour());
    let month = f64::from(local.month());

    let altitude_factor = 1.0 + (altitude_m / 10000.0) * 0.25;
    let latitude_factor = 1.0 - (coordinate.latitude.abs() / 90.0) * 0.3;
    let month_factor = 1.0 + 0.2 * (2.0 * PI * (month - 6.0) / 12.0).cos();

    let radiation =
        RADIATION_BASE_W_M2 * hour_factor(hour) * altitude_factor * latitude_factor * month_factor;

    radiation.max(0.0).round()
}

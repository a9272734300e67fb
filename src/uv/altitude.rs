use crate::models::Coordinate;

/// Coarse elevation band defined by open half-planes on latitude and longitude.
///
/// A bound of `None` means the side is unconstrained. Zones are checked in
/// table order and the first match wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltitudeZone {
    pub name: &'static str,
    pub latitude_above: Option<f64>,
    pub latitude_below: Option<f64>,
    pub longitude_above: Option<f64>,
    pub longitude_below: Option<f64>,
    pub altitude_m: f64,
}

impl AltitudeZone {
    const fn new(name: &'static str, altitude_m: f64) -> Self {
        Self {
            name,
            latitude_above: None,
            latitude_below: None,
            longitude_above: None,
            longitude_below: None,
            altitude_m,
        }
    }

    const fn latitude_above(mut self, bound: f64) -> Self {
        self.latitude_above = Some(bound);
        self
    }

    const fn latitude_below(mut self, bound: f64) -> Self {
        self.latitude_below = Some(bound);
        self
    }

    const fn longitude_above(mut self, bound: f64) -> Self {
        self.longitude_above = Some(bound);
        self
    }

    const fn longitude_below(mut self, bound: f64) -> Self {
        self.longitude_below = Some(bound);
        self
    }

    #[must_use]
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        self.latitude_above.is_none_or(|b| coordinate.latitude > b)
            && self.latitude_below.is_none_or(|b| coordinate.latitude < b)
            && self.longitude_above.is_none_or(|b| coordinate.longitude > b)
            && self.longitude_below.is_none_or(|b| coordinate.longitude < b)
    }
}

pub const ALTITUDE_ZONES: [AltitudeZone; 6] = [
    AltitudeZone::new("Selva norte", 150.0)
        .latitude_above(-6.0)
        .longitude_above(-75.0),
    AltitudeZone::new("Selva central", 400.0)
        .latitude_above(-12.0)
        .longitude_above(-76.0),
    AltitudeZone::new("Selva sur", 200.0)
        .latitude_above(-15.0)
        .longitude_above(-76.0),
    AltitudeZone::new("Costa", 100.0).longitude_below(-76.0),
    AltitudeZone::new("Altiplano", 3800.0)
        .longitude_below(-70.0)
        .latitude_below(-14.0),
    AltitudeZone::new("Sierra alta", 3200.0).longitude_below(-72.0),
];

/// Fallback when no zone matches
pub const DEFAULT_ALTITUDE_M: f64 = 2500.0;

/// Approximate elevation in meters for a point in Peru.
///
/// Total over all valid coordinates; points outside the country still get a
/// band value.
#[must_use]
pub fn estimate_altitude(coordinate: &Coordinate) -> f64 {
    match ALTITUDE_ZONES.iter().find(|zone| zone.contains(coordinate)) {
        Some(zone) => {
            tracing::debug!(zone = zone.name, altitude_m = zone.altitude_m, "Altitude zone matched");
            zone.altitude_m
        }
        None => DEFAULT_ALTITUDE_M,
    }
}

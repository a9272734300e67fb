//! Reference cities used to place backup observations on the map
//!
//! The backup provider only publishes location names. Each harvested name is
//! folded (lowercase, accents stripped) and matched against a fixed table of
//! Peruvian cities by two-way substring containment.

use crate::models::{Coordinate, Observation};
use tracing::debug;

/// Kilometers per degree used for the flat-earth distance estimate
pub const KM_PER_DEGREE: f64 = 111.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityReference {
    /// Folded (lowercase, unaccented) key
    pub name: &'static str,
    pub coordinate: Coordinate,
}

const fn city(name: &'static str, latitude: f64, longitude: f64) -> CityReference {
    CityReference {
        name,
        coordinate: Coordinate::fixed(latitude, longitude),
    }
}

pub static CITIES: [CityReference; 20] = [
    city("lima", -12.0464, -77.0428),
    city("callao", -12.0566, -77.1181),
    city("cusco", -13.5319, -71.9675),
    city("arequipa", -16.3409, -71.5675),
    city("trujillo", -8.0819, -79.1094),
    city("chiclayo", -6.7714, -79.8397),
    city("iquitos", -3.7833, -73.3094),
    city("puno", -15.8422, -70.0199),
    city("cajamarca", -7.1381, -78.4894),
    city("piura", -5.2008, -80.6267),
    city("huancayo", -12.0653, -75.2097),
    city("ayacucho", -13.1583, -74.2233),
    city("huaraz", -9.5312, -77.5283),
    city("tarapoto", -6.5008, -76.3622),
    city("pucallpa", -8.3789, -74.5744),
    city("tacna", -18.0147, -70.2675),
    city("tumbes", -3.5664, -80.4514),
    city("huanuco", -9.9306, -76.2422),
    city("ica", -14.0678, -75.7267),
    city("moquegua", -17.1964, -70.9350),
];

/// Closest observation to a target coordinate
#[derive(Debug, Clone, PartialEq)]
pub struct NearestMatch {
    pub observation: Observation,
    pub city: &'static str,
    /// Rounded kilometers between target and matched city
    pub distance_km: f64,
    pub reference: Coordinate,
}

/// Lowercase and strip Spanish diacritics
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
pub struct Gazetteer {
    cities: &'static [CityReference],
}

impl Gazetteer {
    #[must_use]
    pub fn peru() -> Self {
        Self { cities: &CITIES }
    }

    /// Every reference city whose key contains, or is contained in, the folded name
    pub fn matches(&self, name: &str) -> impl Iterator<Item = &'static CityReference> {
        let folded = normalize_name(name.trim());
        let cities: &'static [CityReference] = self.cities;
        cities.iter().filter(move |c| {
            !folded.is_empty() && (folded.contains(c.name) || c.name.contains(folded.as_str()))
        })
    }

    /// Pick the observation whose matching reference city lies closest to `target`.
    ///
    /// Unresolvable names are skipped. Only a strictly smaller distance
    /// replaces the current best, so ties keep the earlier observation and
    /// the earlier table entry.
    #[must_use]
    pub fn nearest(&self, target: &Coordinate, observations: &[Observation]) -> Option<NearestMatch> {
        let mut best: Option<(f64, &Observation, &'static CityReference)> = None;

        for observation in observations {
            let mut matched = false;
            for reference in self.matches(&observation.name) {
                matched = true;
                let distance = target.degree_distance(&reference.coordinate);
                if best.is_none_or(|(d, _, _)| distance < d) {
                    best = Some((distance, observation, reference));
                }
            }
            if !matched {
                debug!(name = %observation.name, "No reference city for observation");
            }
        }

        best.map(|(distance, observation, reference)| NearestMatch {
            observation: observation.clone(),
            city: reference.name,
            distance_km: (distance * KM_PER_DEGREE).round(),
            reference: reference.coordinate,
        })
    }
}

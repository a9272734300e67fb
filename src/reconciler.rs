//! Multi-source UV acquisition and reconciliation
//!
//! [`UvService`] owns the provider adapters, the gazetteer and the result
//! cache. A `/radiacion` request walks these stages:
//!
//! 1. cache check, returning early with the entry's age on a hit
//! 2. both providers fetched concurrently, each settling to data or `None`
//! 3. precedence: realtime, then backup within 200 km, then the estimator
//! 4. classification of the chosen index
//! 5. write-through to the cache
//!
//! The `/pronostico` variant only consults the realtime provider and fails
//! with [`UvError::ServiceUnavailable`] when it has no forecast.

use crate::UvError;
use crate::cache::ReportCache;
use crate::clock::{Clock, region_time};
use crate::config::UvConfig;
use crate::gazetteer::{Gazetteer, NearestMatch};
use crate::models::{
    Alert, Coordinate, ForecastPoint, ForecastReport, Observation, Precision, RadiationReading,
    RadiationReport, ReportCoordinates, UvReading, UvSection,
};
use crate::sources::{
    BackupSource, CurrentUvIndexClient, RealtimeReading, RealtimeSource, SenamhiScraper,
};
use crate::uv::{classify, estimate_altitude, estimate_radiation, estimate_uv};
use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use futures::future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinError;
use tracing::{debug, info, instrument, warn};

/// W/m² derived per UV index point when the realtime provider answers
pub const RADIATION_PER_UV_INDEX: f64 = 90.0;

/// Backup observations farther than this are ignored
pub const MAX_BACKUP_DISTANCE_KM: f64 = 200.0;

/// Forecast points carried in a `/radiacion` record
pub const REPORT_FORECAST_POINTS: usize = 24;

/// Lima, used by the provider diagnostics
pub const PROBE_COORDINATE: Coordinate = Coordinate::fixed(-12.0464, -77.0428);

const REALTIME_SOURCE_LABEL: &str = "CurrentUVIndex API (tiempo real)";
const ESTIMATED_UV_LABEL: &str = "Cálculo estimado UV";
const ESTIMATED_RADIATION_LABEL: &str = "Cálculo estimado radiación";

/// Validated `/radiacion` input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiationRequest {
    pub coordinate: Coordinate,
    /// Caller-supplied altitude in meters; estimated from the coordinate when absent
    pub altitude_m: Option<f64>,
}

/// A report plus how old it was if it came from the cache
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub report: RadiationReport,
    pub cache_age_minutes: Option<i64>,
}

/// Outcome of probing one provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome<T> {
    pub elapsed: Duration,
    pub data: Option<T>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderProbe {
    pub realtime: ProbeOutcome<RealtimeReading>,
    pub backup: ProbeOutcome<Vec<Observation>>,
}

/// Values chosen by the precedence stage, before classification
#[derive(Debug)]
struct Selection {
    uv: UvReading,
    radiation: RadiationReading,
    forecast: Option<Vec<ForecastPoint>>,
    sources: Vec<String>,
    precision: Precision,
    alerts: Vec<Alert>,
}

pub struct UvService {
    realtime: Arc<dyn RealtimeSource>,
    backup: Arc<dyn BackupSource>,
    gazetteer: Gazetteer,
    cache: Arc<ReportCache>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for UvService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UvService")
            .field("realtime", &self.realtime.name())
            .field("backup", &self.backup.name())
            .field("cached_reports", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl UvService {
    pub fn new(
        realtime: Arc<dyn RealtimeSource>,
        backup: Arc<dyn BackupSource>,
        cache: Arc<ReportCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            realtime,
            backup,
            gazetteer: Gazetteer::peru(),
            cache,
            clock,
        }
    }

    /// Wire up the production providers
    pub fn from_config(config: &UvConfig, clock: Arc<dyn Clock>) -> Result<Self, UvError> {
        let realtime = CurrentUvIndexClient::new(&config.realtime, Arc::clone(&clock))?;
        let backup = SenamhiScraper::new(&config.backup)?;
        let cache = Arc::new(ReportCache::new(Arc::clone(&clock)));
        Ok(Self::new(Arc::new(realtime), Arc::new(backup), cache, clock))
    }

    #[must_use]
    pub fn cache(&self) -> &ReportCache {
        &self.cache
    }

    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Resolve the UV index and radiation for one coordinate. Never fails:
    /// provider outages degrade to backup data or the estimator.
    #[instrument(skip(self), fields(key = %request.coordinate.cache_key()))]
    pub async fn radiation(&self, request: RadiationRequest) -> Resolution {
        let key = request.coordinate.cache_key();

        if let Some(entry) = self.cache.get(&key) {
            let age = entry.age_minutes(self.clock.now());
            info!(age_minutes = age, "Serving cached report");
            return Resolution {
                report: entry.payload,
                cache_age_minutes: Some(age),
            };
        }

        let altitude = request
            .altitude_m
            .unwrap_or_else(|| estimate_altitude(&request.coordinate));
        debug!(altitude, "Cache miss, querying providers");

        let (realtime, backup) = self.fetch_concurrently(request.coordinate).await;
        let now = self.clock.now();
        let selection = self.apply_precedence(request.coordinate, altitude, realtime, backup, now);
        let report = assemble(request.coordinate, altitude, selection, now);

        info!(
            uv = report.uv.indice,
            radiation = report.radiation.valor,
            sources = ?report.sources,
            "Report assembled"
        );
        self.cache.put(&key, report.clone());

        Resolution {
            report,
            cache_age_minutes: None,
        }
    }

    /// Hourly and daily forecast straight from the realtime provider
    #[instrument(skip(self))]
    pub async fn forecast(&self, coordinate: Coordinate) -> Result<ForecastReport, UvError> {
        let reading = self
            .realtime
            .current(coordinate)
            .await
            .ok_or_else(|| UvError::unavailable("realtime provider returned no data"))?;

        if reading.forecast.is_empty() {
            return Err(UvError::unavailable("realtime provider returned an empty forecast"));
        }

        Ok(ForecastReport::new(
            coordinate,
            reading.current.uv_index,
            &reading.forecast,
            self.clock.now(),
        ))
    }

    /// Query both providers at [`PROBE_COORDINATE`] and time each call
    pub async fn probe(&self) -> ProviderProbe {
        let started = Instant::now();
        let realtime = self.realtime.current(PROBE_COORDINATE).await;
        let realtime = ProbeOutcome {
            elapsed: started.elapsed(),
            data: realtime,
        };

        let started = Instant::now();
        let backup = self.backup.observations().await;
        let backup = ProbeOutcome {
            elapsed: started.elapsed(),
            data: backup,
        };

        ProviderProbe { realtime, backup }
    }

    /// Run both providers as independent tasks and wait for both to settle
    async fn fetch_concurrently(
        &self,
        coordinate: Coordinate,
    ) -> (Option<RealtimeReading>, Option<Vec<Observation>>) {
        let realtime = Arc::clone(&self.realtime);
        let backup = Arc::clone(&self.backup);

        let realtime_task = tokio::spawn(async move { realtime.current(coordinate).await });
        let backup_task = tokio::spawn(async move { backup.observations().await });

        let (realtime, backup) = future::join(realtime_task, backup_task).await;
        (
            settled(self.realtime.name(), realtime),
            settled(self.backup.name(), backup),
        )
    }

    fn apply_precedence(
        &self,
        coordinate: Coordinate,
        altitude: f64,
        realtime: Option<RealtimeReading>,
        backup: Option<Vec<Observation>>,
        now: DateTime<Utc>,
    ) -> Selection {
        let mut sources = Vec::new();
        let mut alerts = Vec::new();

        if let Some(reading) = realtime {
            let forecast: Vec<ForecastPoint> = reading
                .forecast
                .into_iter()
                .take(REPORT_FORECAST_POINTS)
                .collect();
            let index = select_forecast_index(&forecast, region_time(now).hour())
                .unwrap_or(reading.current.uv_index);
            sources.push(REALTIME_SOURCE_LABEL.to_string());

            return Selection {
                uv: UvReading {
                    index,
                    source_is_real: true,
                },
                radiation: RadiationReading {
                    watts_per_m2: (index * RADIATION_PER_UV_INDEX).round(),
                    source_is_real: true,
                },
                forecast: Some(forecast),
                sources,
                precision: Precision::Realtime,
                alerts,
            };
        }

        warn!("Realtime provider unavailable, falling back");
        alerts.push(Alert::warning(
            "API principal no disponible",
            "CurrentUVIndex no responde, usando datos alternativos",
        ));

        let nearby = backup
            .as_deref()
            .and_then(|observations| self.gazetteer.nearest(&coordinate, observations))
            .filter(|m| m.distance_km < MAX_BACKUP_DISTANCE_KM);

        let (uv, precision) = match nearby {
            Some(NearestMatch {
                observation,
                distance_km,
                ..
            }) => {
                debug!(city = %observation.name, distance_km, "Using backup observation");
                sources.push(format!(
                    "SENAMHI Web ({}, ~{distance_km:.0}km)",
                    observation.name
                ));
                let uv = UvReading {
                    index: observation.value,
                    source_is_real: true,
                };
                (uv, Precision::Backup)
            }
            None => {
                alerts.push(Alert::error(
                    "APIs no responden",
                    "Usando datos estimados. Los servicios externos pueden estar temporalmente inaccesibles.",
                ));
                sources.push(ESTIMATED_UV_LABEL.to_string());
                let uv = UvReading {
                    index: estimate_uv(&coordinate, altitude, now),
                    source_is_real: false,
                };
                (uv, Precision::Estimated)
            }
        };

        sources.push(ESTIMATED_RADIATION_LABEL.to_string());
        Selection {
            uv,
            radiation: RadiationReading {
                watts_per_m2: estimate_radiation(&coordinate, altitude, now),
                source_is_real: false,
            },
            forecast: None,
            sources,
            precision,
            alerts,
        }
    }
}

/// Classify the chosen index and build the record
fn assemble(
    coordinate: Coordinate,
    altitude: f64,
    selection: Selection,
    now: DateTime<Utc>,
) -> RadiationReport {
    let classification = classify(selection.uv.index);
    debug!(
        index = selection.uv.index,
        level = classification.level.label(),
        "UV index classified"
    );

    RadiationReport {
        coordinates: ReportCoordinates {
            lat: coordinate.latitude,
            lng: coordinate.longitude,
            altitud: altitude.round() as i64,
        },
        uv: UvSection::new(selection.uv, classification),
        radiation: selection.radiation.into(),
        forecast: selection.forecast,
        sources: selection.sources,
        precision: selection.precision,
        alerts: selection.alerts,
        local_time: region_time(now).format("%H:%M:%S").to_string(),
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// Index of the forecast point for `local_hour`: an exact hour match, else the
/// smallest absolute hour difference, earliest point winning ties
fn select_forecast_index(forecast: &[ForecastPoint], local_hour: u32) -> Option<f64> {
    let hour_of = |point: &ForecastPoint| region_time(point.timestamp).hour();

    if let Some(exact) = forecast.iter().find(|p| hour_of(p) == local_hour) {
        return Some(exact.uv_index);
    }

    let mut closest: Option<(u32, f64)> = None;
    for point in forecast {
        let diff = hour_of(point).abs_diff(local_hour);
        if closest.is_none_or(|(best, _)| diff < best) {
            closest = Some((diff, point.uv_index));
        }
    }
    closest.map(|(_, index)| index)
}

/// A provider task that panicked or was cancelled counts as "no data"
fn settled<T>(provider: &str, result: Result<Option<T>, JoinError>) -> Option<T> {
    result.unwrap_or_else(|e| {
        warn!("{provider} task failed: {e}");
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::uv::UvLevel;
    use async_trait::async_trait;
    use chrono::{TimeDelta, TimeZone};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const LIMA: Coordinate = Coordinate::fixed(-12.0464, -77.0428);

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, hour, 0, 0).unwrap()
    }

    fn point(hour: u32, uvi: f64) -> ForecastPoint {
        ForecastPoint {
            timestamp: at(hour),
            uv_index: uvi,
        }
    }

    #[derive(Default)]
    struct FakeRealtime {
        reading: Option<RealtimeReading>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RealtimeSource for FakeRealtime {
        fn name(&self) -> &'static str {
            "fake-realtime"
        }

        async fn current(&self, _coordinate: Coordinate) -> Option<RealtimeReading> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reading.clone()
        }
    }

    #[derive(Default)]
    struct FakeBackup {
        observations: Option<Vec<Observation>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl BackupSource for FakeBackup {
        fn name(&self) -> &'static str {
            "fake-backup"
        }

        async fn observations(&self) -> Option<Vec<Observation>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.observations.clone()
        }
    }

    struct PanickingBackup;

    #[async_trait]
    impl BackupSource for PanickingBackup {
        fn name(&self) -> &'static str {
            "panicking-backup"
        }

        async fn observations(&self) -> Option<Vec<Observation>> {
            panic!("scraper exploded");
        }
    }

    fn lima_reading() -> RealtimeReading {
        RealtimeReading {
            current: point(19, 6.9),
            today_max: 7.2,
            forecast: vec![point(18, 5.5), point(19, 7.2), point(20, 6.1)],
        }
    }

    struct Harness {
        clock: Arc<ManualClock>,
        realtime: Arc<FakeRealtime>,
        backup: Arc<FakeBackup>,
        service: UvService,
    }

    fn harness(reading: Option<RealtimeReading>, observations: Option<Vec<Observation>>) -> Harness {
        let clock = Arc::new(ManualClock::new(at(19)));
        let realtime = Arc::new(FakeRealtime {
            reading,
            ..FakeRealtime::default()
        });
        let backup = Arc::new(FakeBackup {
            observations,
            ..FakeBackup::default()
        });
        let cache = Arc::new(ReportCache::new(clock.clone()));
        let service = UvService::new(realtime.clone(), backup.clone(), cache, clock.clone());
        Harness {
            clock,
            realtime,
            backup,
            service,
        }
    }

    fn request(coordinate: Coordinate) -> RadiationRequest {
        RadiationRequest {
            coordinate,
            altitude_m: None,
        }
    }

    #[tokio::test]
    async fn test_realtime_takes_precedence() {
        let h = harness(
            Some(lima_reading()),
            Some(vec![Observation::new("Lima", 2.0)]),
        );
        let report = h.service.radiation(request(LIMA)).await.report;

        assert_eq!(report.uv.indice, 7.2);
        assert_eq!(report.uv.nivel, UvLevel::High);
        assert!(report.uv.fuente_real);
        assert_eq!(report.radiation.valor, 648);
        assert!(report.radiation.fuente_real);
        assert_eq!(report.coordinates.altitud, 100);
        assert_eq!(report.precision, Precision::Realtime);
        assert_eq!(report.sources, vec!["CurrentUVIndex API (tiempo real)"]);
        assert!(report.alerts.is_empty());
        assert_eq!(report.forecast.as_ref().unwrap().len(), 3);
        assert_eq!(report.local_time, "14:00:00");
        assert_eq!(report.timestamp, "2026-03-10T19:00:00.000Z");
        assert_eq!(h.backup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_backup_used_within_range() {
        let h = harness(None, Some(vec![Observation::new("Lima Metropolitana", 9.5)]));
        let report = h.service.radiation(request(LIMA)).await.report;

        assert_eq!(report.uv.indice, 9.5);
        assert!(report.uv.fuente_real);
        assert!(!report.radiation.fuente_real);
        assert_eq!(report.precision, Precision::Backup);
        assert_eq!(
            report.sources,
            vec![
                "SENAMHI Web (Lima Metropolitana, ~0km)",
                "Cálculo estimado radiación"
            ]
        );
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0].message, "API principal no disponible");
        assert!(report.forecast.is_none());
    }

    #[tokio::test]
    async fn test_distant_backup_is_ignored() {
        let h = harness(None, Some(vec![Observation::new("Cusco", 14.0)]));
        let report = h.service.radiation(request(LIMA)).await.report;

        assert!(!report.uv.fuente_real);
        assert_eq!(report.precision, Precision::Estimated);
        assert_eq!(report.uv.indice, estimate_uv(&LIMA, 100.0, at(19)));
    }

    #[tokio::test]
    async fn test_total_outage_falls_back_to_estimates() {
        let h = harness(None, None);
        let report = h.service.radiation(request(LIMA)).await.report;

        assert!(!report.uv.fuente_real);
        assert!(!report.radiation.fuente_real);
        assert_eq!(report.precision, Precision::Estimated);
        assert_eq!(
            report.sources,
            vec!["Cálculo estimado UV", "Cálculo estimado radiación"]
        );
        let kinds: Vec<_> = report.alerts.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![crate::models::AlertKind::Warning, crate::models::AlertKind::Error]
        );
        assert_eq!(
            report.radiation.valor,
            estimate_radiation(&LIMA, 100.0, at(19)) as i64
        );
    }

    #[tokio::test]
    async fn test_panicking_provider_settles_as_no_data() {
        let clock = Arc::new(ManualClock::new(at(19)));
        let cache = Arc::new(ReportCache::new(clock.clone()));
        let service = UvService::new(
            Arc::new(FakeRealtime::default()),
            Arc::new(PanickingBackup),
            cache,
            clock,
        );
        let report = service.radiation(request(LIMA)).await.report;
        assert_eq!(report.precision, Precision::Estimated);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_providers() {
        let h = harness(Some(lima_reading()), None);
        let first = h.service.radiation(request(LIMA)).await;
        assert_eq!(first.cache_age_minutes, None);

        h.clock.advance(TimeDelta::minutes(10));
        let nearby = Coordinate::fixed(-12.046_41, -77.042_84);
        let second = h.service.radiation(request(nearby)).await;

        assert_eq!(second.cache_age_minutes, Some(10));
        assert_eq!(second.report, first.report);
        assert_eq!(h.realtime.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let h = harness(Some(lima_reading()), None);
        h.service.radiation(request(LIMA)).await;

        h.clock.advance(TimeDelta::minutes(30));
        let again = h.service.radiation(request(LIMA)).await;

        assert_eq!(again.cache_age_minutes, None);
        assert_eq!(h.realtime.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_caller_altitude_is_kept() {
        let h = harness(None, None);
        let report = h
            .service
            .radiation(RadiationRequest {
                coordinate: LIMA,
                altitude_m: Some(3399.6),
            })
            .await
            .report;
        assert_eq!(report.coordinates.altitud, 3400);
        assert_eq!(report.uv.indice, estimate_uv(&LIMA, 3399.6, at(19)));
    }

    #[tokio::test]
    async fn test_forecast_requires_realtime() {
        let h = harness(None, Some(vec![Observation::new("Lima", 9.5)]));
        let err = h.service.forecast(LIMA).await.unwrap_err();
        assert!(matches!(err, UvError::ServiceUnavailable { .. }));

        let empty = RealtimeReading {
            forecast: vec![],
            ..lima_reading()
        };
        let h = harness(Some(empty), None);
        assert!(h.service.forecast(LIMA).await.is_err());

        let h = harness(Some(lima_reading()), None);
        let report = h.service.forecast(LIMA).await.unwrap();
        assert_eq!(report.uv_actual, 6.9);
        assert_eq!(report.pronostico_horas.len(), 3);
    }

    #[tokio::test]
    async fn test_probe_reports_both_providers() {
        let h = harness(Some(lima_reading()), None);
        let probe = h.service.probe().await;
        assert!(probe.realtime.data.is_some());
        assert!(probe.backup.data.is_none());
    }

    #[test]
    fn test_select_exact_hour() {
        // 18Z, 19Z, 20Z are 13:00, 14:00, 15:00 in Lima
        let forecast = vec![point(18, 5.5), point(19, 7.2), point(20, 6.1)];
        assert_eq!(select_forecast_index(&forecast, 14), Some(7.2));
    }

    #[test]
    fn test_select_closest_hour_first_wins_ties() {
        let forecast = vec![point(18, 5.5), point(20, 6.1)];
        // 14:00 is one hour from both 13:00 and 15:00
        assert_eq!(select_forecast_index(&forecast, 14), Some(5.5));
        assert_eq!(select_forecast_index(&forecast, 23), Some(6.1));
        assert_eq!(select_forecast_index(&[], 14), None);
    }

    #[tokio::test]
    async fn test_empty_forecast_uses_current_reading() {
        let reading = RealtimeReading {
            forecast: vec![],
            ..lima_reading()
        };
        let h = harness(Some(reading), None);
        let report = h.service.radiation(request(LIMA)).await.report;
        assert_eq!(report.uv.indice, 6.9);
        assert_eq!(report.radiation.valor, 621);
    }
}

use super::{RealtimeReading, RealtimeSource, http_client};
use crate::UvError;
use crate::clock::Clock;
use crate::config::RealtimeConfig;
use crate::models::{Coordinate, ForecastPoint};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const PROVIDER: &str = "CurrentUVIndex";

/// Wire format of `GET {base_url}?latitude=..&longitude=..`
#[derive(Debug, Deserialize)]
struct UviResponse {
    #[serde(default)]
    ok: bool,
    now: Option<ForecastPoint>,
    #[serde(default)]
    forecast: Vec<ForecastPoint>,
}

/// Client for the keyless currentuvindex.com API
#[derive(Debug, Clone)]
pub struct CurrentUvIndexClient {
    client: Client,
    base_url: String,
    clock: Arc<dyn Clock>,
}

impl CurrentUvIndexClient {
    pub fn new(config: &RealtimeConfig, clock: Arc<dyn Clock>) -> Result<Self, UvError> {
        Ok(Self {
            client: http_client(config.timeout_seconds, &config.user_agent)?,
            base_url: config.base_url.clone(),
            clock,
        })
    }

    async fn fetch(&self, coordinate: Coordinate) -> Result<RealtimeReading, UvError> {
        let url = format!(
            "{}?latitude={}&longitude={}",
            self.base_url, coordinate.latitude, coordinate.longitude
        );
        debug!("Requesting {url}");

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body: UviResponse = response.json().await?;

        if !body.ok {
            return Err(UvError::provider(PROVIDER, "payload flag ok is false"));
        }
        let current = body
            .now
            .ok_or_else(|| UvError::provider(PROVIDER, "payload has no current reading"))?;

        let today_max = today_max(&current, &body.forecast, self.clock.now());

        Ok(RealtimeReading {
            current,
            today_max,
            forecast: body.forecast,
        })
    }
}

/// Largest index among the current reading and today's (UTC) forecast points
fn today_max(current: &ForecastPoint, forecast: &[ForecastPoint], now: DateTime<Utc>) -> f64 {
    let today = now.date_naive();
    forecast
        .iter()
        .filter(|point| point.timestamp.date_naive() == today)
        .map(|point| point.uv_index)
        .fold(current.uv_index, f64::max)
}

#[async_trait]
impl RealtimeSource for CurrentUvIndexClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    #[instrument(name = "realtime_uv", skip(self), fields(lat = coordinate.latitude, lng = coordinate.longitude))]
    async fn current(&self, coordinate: Coordinate) -> Option<RealtimeReading> {
        match self.fetch(coordinate).await {
            Ok(reading) => {
                info!(
                    uv = reading.current.uv_index,
                    forecast_points = reading.forecast.len(),
                    "Realtime UV reading received"
                );
                Some(reading)
            }
            Err(e) => {
                warn!("{PROVIDER} unavailable: {e}");
                None
            }
        }
    }
}

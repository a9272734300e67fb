//! Upstream UV data providers
//!
//! Both adapters swallow every failure at their boundary: the trait methods
//! return `None` for "no data" and log the cause, so the reconciler never has
//! to handle transport errors.

use crate::UvError;
use crate::models::{Coordinate, ForecastPoint, Observation};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub mod current_uv;
pub mod senamhi;

pub use current_uv::CurrentUvIndexClient;
pub use senamhi::{SenamhiScraper, extract_observations};

/// Parsed answer of the realtime provider
#[derive(Debug, Clone, PartialEq)]
pub struct RealtimeReading {
    /// Current reading as reported by the provider
    pub current: ForecastPoint,
    /// Highest index seen today, never below the current index
    pub today_max: f64,
    /// Hourly forecast in provider order
    pub forecast: Vec<ForecastPoint>,
}

#[async_trait]
pub trait RealtimeSource: Send + Sync {
    /// Display name used in logs and diagnostics
    fn name(&self) -> &'static str;

    async fn current(&self, coordinate: Coordinate) -> Option<RealtimeReading>;
}

#[async_trait]
pub trait BackupSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Every (location, UV) pair currently published, or `None` when nothing usable came back
    async fn observations(&self) -> Option<Vec<Observation>>;
}

/// Build a client with a per-provider timeout and user agent
pub fn http_client(timeout_seconds: u32, user_agent: &str) -> Result<Client, UvError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(u64::from(timeout_seconds)))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

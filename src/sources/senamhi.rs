use super::{BackupSource, http_client};
use crate::UvError;
use crate::config::BackupConfig;
use crate::models::Observation;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{debug, info, instrument, warn};

const PROVIDER: &str = "SENAMHI";

/// Largest UV value accepted from the page
const MAX_PLAUSIBLE_UV: f64 = 20.0;

/// `name: 13 uv` / `name - 13 índice`
static LABELLED_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\w+(?:\s+\w+)*)\s*[:\-]\s*(\d+\.?\d*)\s*(?:uv|índice)")
        .expect("labelled value pattern is valid")
});

/// `name 13 uv`
static INLINE_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\w+(?:\s+\w+)*)\s*(\d+\.?\d*)\s*uv").expect("inline value pattern is valid")
});

/// Two adjacent table cells
static TABLE_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<td[^>]*>([^<]+)</td>\s*<td[^>]*>(\d+\.?\d*)</td>")
        .expect("table row pattern is valid")
});

/// Extraction patterns, applied in order; each yields (name, value) captures
fn patterns() -> [&'static Regex; 3] {
    [&*LABELLED_VALUE, &*INLINE_VALUE, &*TABLE_ROW]
}

/// Harvest (location, UV) pairs from raw page markup.
///
/// Keeps values in (0, 20] and names longer than two characters; names are
/// de-duplicated case-insensitively, first occurrence wins.
#[must_use]
pub fn extract_observations(html: &str) -> Vec<Observation> {
    let mut seen = HashSet::new();
    let mut observations = Vec::new();

    for pattern in patterns() {
        for captures in pattern.captures_iter(html) {
            let (Some(name), Some(value)) = (captures.get(1), captures.get(2)) else {
                continue;
            };
            let name = name.as_str().trim();
            let Ok(value) = value.as_str().parse::<f64>() else {
                continue;
            };

            if value <= 0.0 || value > MAX_PLAUSIBLE_UV || name.chars().count() <= 2 {
                continue;
            }
            if seen.insert(name.to_lowercase()) {
                observations.push(Observation::new(name, value));
            }
        }
    }

    observations
}

/// Scraper for the SENAMHI numeric UV page
#[derive(Debug, Clone)]
pub struct SenamhiScraper {
    client: Client,
    url: String,
}

impl SenamhiScraper {
    pub fn new(config: &BackupConfig) -> Result<Self, UvError> {
        Ok(Self {
            client: http_client(config.timeout_seconds, &config.user_agent)?,
            url: config.url.clone(),
        })
    }

    async fn fetch(&self) -> Result<Vec<Observation>, UvError> {
        debug!("Requesting {}", self.url);
        let html = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let observations = extract_observations(&html);
        if observations.is_empty() {
            return Err(UvError::provider(PROVIDER, "no UV values found in page"));
        }
        Ok(observations)
    }
}

#[async_trait]
impl BackupSource for SenamhiScraper {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    #[instrument(name = "backup_uv", skip(self))]
    async fn observations(&self) -> Option<Vec<Observation>> {
        match self.fetch().await {
            Ok(observations) => {
                info!(cities = observations.len(), "Backup UV values extracted");
                Some(observations)
            }
            Err(e) => {
                warn!("{PROVIDER} unavailable: {e}");
                None
            }
        }
    }
}

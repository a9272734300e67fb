//! `uv-radiation` - UV index and solar radiation service for Peru
//!
//! This library resolves the UV index and solar radiation at a coordinate by
//! querying a realtime provider and a scraped backup concurrently, falling
//! back to heuristic estimates when neither answers.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod gazetteer;
pub mod models;
pub mod reconciler;
pub mod sources;
pub mod telemetry;
pub mod uv;
pub mod web;

// Re-export core types for public API
pub use cache::{CacheEntry, ReportCache, TtlCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::UvConfig;
pub use error::UvError;
pub use gazetteer::{Gazetteer, NearestMatch};
pub use models::{Coordinate, ForecastReport, RadiationReport};
pub use reconciler::{RadiationRequest, Resolution, UvService};
pub use sources::{BackupSource, RealtimeReading, RealtimeSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

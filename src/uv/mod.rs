//! Pure UV domain functions
//!
//! - Classifier: UV index to exposure level, color and risk
//! - Estimator: heuristic UV index and radiation when no provider answers
//! - Altitude: coarse elevation bands for the covered region

pub mod altitude;
pub mod classifier;
pub mod estimator;

pub use altitude::{AltitudeZone, estimate_altitude};
pub use classifier::{Classification, RiskLevel, UvLevel, classify};
pub use estimator::{estimate_radiation, estimate_uv};

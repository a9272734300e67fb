//! Time source abstraction
//!
//! Everything that depends on "now" (cache expiry, the hour used to pick a
//! forecast point, the heuristic estimators) reads it through a [`Clock`] so
//! tests can pin the time of day.

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use std::fmt::Debug;
use std::sync::atomic::{AtomicI64, Ordering};

/// Fixed timezone of the covered region; "local hour" always means this zone
pub const REGION_TZ: Tz = chrono_tz::America::Lima;

/// Convert an instant to the region's wall-clock time
#[must_use]
pub fn region_time(instant: DateTime<Utc>) -> DateTime<Tz> {
    instant.with_timezone(&REGION_TZ)
}

pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and simulations
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(start.timestamp_millis()),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        self.millis
            .store(instant.timestamp_millis(), Ordering::SeqCst);
    }

    pub fn advance(&self, delta: TimeDelta) {
        self.millis
            .fetch_add(delta.num_milliseconds(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst))
            .unwrap_or(DateTime::UNIX_EPOCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_advance() {
        let start = Utc.with_ymd_and_hms(2026, 3, 10, 19, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(TimeDelta::minutes(31));
        assert_eq!(clock.now(), start + TimeDelta::minutes(31));

        clock.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn test_region_time_is_utc_minus_five() {
        use chrono::Timelike;
        let instant = Utc.with_ymd_and_hms(2026, 3, 10, 19, 0, 0).unwrap();
        assert_eq!(region_time(instant).hour(), 14);
    }
}

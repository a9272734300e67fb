//! Process-wide result cache with lazy time-to-live expiry
//!
//! Owned by the service state and injected where needed. Entries are keyed by
//! the rounded-coordinate string; expired entries are removed when they are
//! read, there is no background sweeper.

use crate::clock::Clock;
use crate::models::RadiationReport;
use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Lifetime of a cached result
pub const CACHE_TTL_MINUTES: i64 = 30;

/// Cache holding assembled `/radiacion` records
pub type ReportCache = TtlCache<RadiationReport>;

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub payload: T,
    pub created_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// Age in whole minutes, rounded to nearest
    #[must_use]
    pub fn age_minutes(&self, now: DateTime<Utc>) -> i64 {
        let millis = (now - self.created_at).num_milliseconds();
        (millis as f64 / 60_000.0).round() as i64
    }
}

#[derive(Debug)]
pub struct TtlCache<T> {
    entries: DashMap<String, CacheEntry<T>>,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
}

impl<T: Clone + Debug> TtlCache<T> {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(clock, TimeDelta::minutes(CACHE_TTL_MINUTES))
    }

    #[must_use]
    pub fn with_ttl(clock: Arc<dyn Clock>, ttl: TimeDelta) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            ttl,
        }
    }

    /// Returns a fresh entry, deleting it instead if it has expired
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub fn get(&self, key: &str) -> Option<CacheEntry<T>> {
        let now = self.clock.now();
        let Some(entry) = self.entries.get(key) else {
            tracing::debug!("Key not found");
            return None;
        };

        if now - entry.created_at < self.ttl {
            tracing::debug!("Key found and still fresh");
            return Some(entry.clone());
        }
        // Release the shard read lock before removing
        drop(entry);

        tracing::debug!("Key found but expired");
        self.entries
            .remove_if(key, |_, e| now - e.created_at >= self.ttl);
        None
    }

    /// Stores a payload stamped with the current time, replacing any previous entry
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, payload))]
    pub fn put(&self, key: &str, payload: T) {
        let entry = CacheEntry {
            payload,
            created_at: self.clock.now(),
        };
        self.entries.insert(key.to_string(), entry);
    }

    /// Drops every entry and returns how many were removed
    pub fn clear(&self) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, _| {
            removed += 1;
            false
        });
        tracing::info!(removed, "Cache cleared");
        removed
    }

    /// Number of stored entries, expired ones included until they are read
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }
}

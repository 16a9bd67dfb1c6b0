//! Cache Metrics System
//!
//! Counters describing what the cache has been doing, reported through the
//! [`CacheMetrics`] trait as a `BTreeMap<String, f64>`.
//!
//! A `BTreeMap` keeps the keys in a fixed, alphabetical order, so two reports
//! of the same cache state are byte-for-byte identical when printed or
//! compared in tests.
//!
//! All accounting is by entry count. The cache never looks at its values, so
//! there are no byte-size metrics.

use std::collections::BTreeMap;

pub mod lru;

pub use lru::LruCacheMetrics;

/// Counters shared by every cache algorithm.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoreCacheMetrics {
    /// Total number of lookups made against the cache
    pub requests: u64,

    /// Number of lookups that found their key
    pub cache_hits: u64,

    /// Number of sets that created a new entry
    pub insertions: u64,

    /// Number of sets that overwrote an existing entry
    pub updates: u64,

    /// Number of entries dropped to make room for a new key
    pub evictions: u64,

    /// Number of times the cache was cleared
    pub clears: u64,

    /// Current number of entries
    pub entries: u64,

    /// Maximum number of entries - the capacity limit
    pub capacity: u64,
}

impl CoreCacheMetrics {
    /// Creates a new CoreCacheMetrics instance for a cache of `capacity` entries
    pub fn new(capacity: u64) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Records a lookup that found its key.
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a lookup that did not find its key.
    ///
    /// Misses are not stored; they are derived as `requests - cache_hits`.
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records a new entry being stored.
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
        self.entries += 1;
    }

    /// Records an existing entry being overwritten in place.
    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    /// Records the least recently used entry being dropped for capacity.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
        self.entries = self.entries.saturating_sub(1);
    }

    /// Records every entry being dropped at once.
    ///
    /// Lifetime counters (requests, hits, evictions...) are kept.
    pub fn record_clear(&mut self) {
        self.clears += 1;
        self.entries = 0;
    }

    /// Number of lookups that did not find their key.
    pub fn cache_misses(&self) -> u64 {
        self.requests - self.cache_hits
    }

    /// Fraction of lookups that hit, between 0.0 and 1.0 (0.0 before any lookup)
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Fraction of lookups that missed, between 0.0 and 1.0 (0.0 before any lookup)
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_misses() as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// How full the cache is, between 0.0 and 1.0
    pub fn utilization(&self) -> f64 {
        if self.capacity > 0 {
            self.entries as f64 / self.capacity as f64
        } else {
            0.0
        }
    }

    /// Convert core metrics to BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        // Counters
        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses() as f64);
        metrics.insert("clears".to_string(), self.clears as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("updates".to_string(), self.updates as f64);

        // Rates (0.0 to 1.0)
        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        // Occupancy
        metrics.insert("capacity".to_string(), self.capacity as f64);
        metrics.insert("len".to_string(), self.entries as f64);
        metrics.insert("utilization".to_string(), self.utilization());

        if self.requests > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.requests as f64,
            );
        }

        metrics
    }
}

/// Uniform interface for reading metrics from a cache.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// A static string identifying the cache algorithm (e.g. "LRU").
    fn algorithm_name(&self) -> &'static str;
}

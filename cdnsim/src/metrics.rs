//! Aggregate traffic metrics.
//!
//! [`TrafficMetrics`] is the single accumulator of request counters for the
//! whole simulation. It is owned by the engine, which is the only writer;
//! observers receive cloned snapshots.
//!
//! The average latency is an incremental arithmetic mean over every request
//! since the last reset, not a decayed moving average. Old samples never
//! lose influence, and the formula accumulates ordinary floating-point
//! drift over long runs. That is the observable behavior of the system
//! being modeled, so it is kept as-is.

use serde::{Deserialize, Serialize};

/// Running aggregate counters for simulated traffic.
///
/// Invariant: `cache_hits + cache_misses == total_requests` after every
/// completed [`record_request`](Self::record_request).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficMetrics {
    /// Requests recorded since the last reset.
    pub total_requests: u64,
    /// Requests that found the content cached at the requested edge.
    pub cache_hits: u64,
    /// Requests that had to go to origin.
    pub cache_misses: u64,
    /// Arithmetic mean of all recorded latencies, in milliseconds.
    #[serde(rename = "avgLatency")]
    pub avg_latency_ms: f64,
    /// Cumulative bandwidth saved by cache hits, in megabytes.
    #[serde(rename = "bandwidthSaved")]
    pub bandwidth_saved_mb: f64,
}

impl TrafficMetrics {
    /// Creates a zeroed accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one simulated request.
    ///
    /// Always increments the total; increments exactly one of hits/misses.
    /// The latency average is recomputed with the incremental mean
    /// `((prev_avg * (n - 1)) + latency) / n` where `n` is the
    /// post-increment total. Bandwidth is credited on hits only.
    pub fn record_request(&mut self, is_cache_hit: bool, latency_ms: f64, bandwidth_saved_mb: f64) {
        self.total_requests += 1;

        if is_cache_hit {
            self.cache_hits += 1;
            self.bandwidth_saved_mb += bandwidth_saved_mb;
        } else {
            self.cache_misses += 1;
        }

        let n = self.total_requests as f64;
        self.avg_latency_ms = ((self.avg_latency_ms * (n - 1.0)) + latency_ms) / n;
    }

    /// Returns a consistent copy of the current counters.
    pub fn snapshot(&self) -> TrafficMetrics {
        self.clone()
    }

    /// Restores all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fraction of requests that were cache hits, in [0.0, 1.0].
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.total_requests as f64
        }
    }
}

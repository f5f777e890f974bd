//! Service configuration.

use crate::sim::{EngineConfig, MaintenanceWeights};
use std::time::Duration;

/// Default interval between simulated requests (15 seconds).
pub const DEFAULT_TRAFFIC_INTERVAL_SECS: u64 = 15;

/// Default interval between maintenance rolls (45 seconds).
pub const DEFAULT_MAINTENANCE_INTERVAL_SECS: u64 = 45;

/// Default interval between content ingestions (60 seconds).
pub const DEFAULT_INGEST_INTERVAL_SECS: u64 = 60;

/// Complete configuration for the simulation daemon.
///
/// The intervals mirror the original background driver: traffic every 15
/// seconds, a weighted maintenance roll every 45 seconds, plus a slower
/// ingestion tick that grows the catalog over time.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Interval between randomly generated requests.
    pub traffic_interval: Duration,
    /// Interval between weighted maintenance rolls.
    pub maintenance_interval: Duration,
    /// Interval between new-content ingestions.
    pub ingest_interval: Duration,
    /// Probability weights for the maintenance roll.
    pub weights: MaintenanceWeights,
    /// Engine tunables.
    pub engine: EngineConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            traffic_interval: Duration::from_secs(DEFAULT_TRAFFIC_INTERVAL_SECS),
            maintenance_interval: Duration::from_secs(DEFAULT_MAINTENANCE_INTERVAL_SECS),
            ingest_interval: Duration::from_secs(DEFAULT_INGEST_INTERVAL_SECS),
            weights: MaintenanceWeights::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Sets the traffic interval.
    pub fn with_traffic_interval(mut self, interval: Duration) -> Self {
        self.traffic_interval = interval;
        self
    }

    /// Sets the maintenance interval.
    pub fn with_maintenance_interval(mut self, interval: Duration) -> Self {
        self.maintenance_interval = interval;
        self
    }

    /// Sets the ingestion interval.
    pub fn with_ingest_interval(mut self, interval: Duration) -> Self {
        self.ingest_interval = interval;
        self
    }

    /// Sets the engine tunables.
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Validates interval and engine bounds.
    pub fn validate(&self) -> Result<(), String> {
        if self.traffic_interval.is_zero()
            || self.maintenance_interval.is_zero()
            || self.ingest_interval.is_zero()
        {
            return Err("intervals must be non-zero".to_string());
        }
        if self.engine.prune_target > self.engine.catalog_ceiling {
            return Err(format!(
                "prune target {} exceeds catalog ceiling {}",
                self.engine.prune_target, self.engine.catalog_ceiling
            ));
        }
        let total =
            self.weights.popularity + self.weights.auto_cache + self.weights.version_update;
        if !(0.0..=1.0).contains(&total) {
            return Err(format!("maintenance weights sum to {total}, expected <= 1.0"));
        }
        Ok(())
    }
}

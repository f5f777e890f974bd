//! The simulation engine.
//!
//! [`CdnEngine`] is the single owner of all mutable simulation state: the
//! catalog store, the metrics accumulator, and the random source. Every
//! operation is synchronous and runs to completion; callers that drive the
//! engine from multiple tasks must serialize access (the service daemon
//! does exactly that by owning the engine inside one task).
//!
//! Randomness and wall-clock time are injected so tests can pin both.

use crate::catalog::{parse_size_mb, CatalogStore, ContentItem};
use crate::clock::{Clock, SystemClock};
use crate::edge::{EdgeLocation, EdgeRegistry};
use crate::metrics::TrafficMetrics;
use crate::sim::latency::compute_latency;
use crate::sim::lifecycle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

/// Engine tunables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Catalog size that triggers pruning (default: 100).
    pub catalog_ceiling: usize,
    /// Catalog size pruning cuts down to (default: 80).
    pub prune_target: usize,
    /// Popularity above which items are auto-cached (default: 70).
    pub auto_cache_threshold: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            catalog_ceiling: 100,
            prune_target: 80,
            auto_cache_threshold: 70,
        }
    }
}

impl EngineConfig {
    /// Sets the catalog ceiling that triggers pruning.
    pub fn with_catalog_ceiling(mut self, ceiling: usize) -> Self {
        self.catalog_ceiling = ceiling;
        self
    }

    /// Sets the catalog size pruning cuts down to.
    pub fn with_prune_target(mut self, target: usize) -> Self {
        self.prune_target = target.min(self.catalog_ceiling);
        self
    }

    /// Sets the auto-cache popularity threshold.
    pub fn with_auto_cache_threshold(mut self, threshold: u8) -> Self {
        self.auto_cache_threshold = threshold;
        self
    }
}

/// Probability weights for the periodic maintenance roll.
///
/// Mirrors the original background driver: 30% popularity re-rank, 20%
/// auto-cache, 10% version update, and the remaining 40% of cycles idle.
#[derive(Debug, Clone)]
pub struct MaintenanceWeights {
    pub popularity: f64,
    pub auto_cache: f64,
    pub version_update: f64,
}

impl Default for MaintenanceWeights {
    fn default() -> Self {
        Self {
            popularity: 0.30,
            auto_cache: 0.20,
            version_update: 0.10,
        }
    }
}

/// What a maintenance cycle ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaintenanceAction {
    /// Popularity re-rank touched this many items.
    Popularity { items: usize },
    /// Auto-caching added this many placements.
    AutoCache { placements: usize },
    /// A version update hit the item with this id (None on empty catalog).
    VersionUpdate { updated: Option<u64> },
    /// The roll landed on the idle band.
    Idle,
}

/// Result of one simulated request.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    /// The requested item, as of immediately after the request.
    pub content: ContentItem,
    /// The edge that served the request.
    pub location: EdgeLocation,
    /// Simulated latency in milliseconds.
    pub latency_ms: u32,
    /// Whether the content was cached at the edge.
    pub cached: bool,
}

/// The simulation engine: catalog, metrics, and the models that drive them.
pub struct CdnEngine<R: Rng = StdRng, C: Clock = SystemClock> {
    registry: EdgeRegistry,
    catalog: CatalogStore,
    metrics: TrafficMetrics,
    config: EngineConfig,
    rng: R,
    clock: C,
}

impl CdnEngine {
    /// Creates an engine with the default registry, seed catalog, an
    /// entropy-seeded RNG, and the system clock.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_rng_and_clock(config, StdRng::from_entropy(), SystemClock)
    }

    /// Creates an engine with a reproducible RNG seed and the system clock.
    pub fn seeded(config: EngineConfig, seed: u64) -> Self {
        Self::with_rng_and_clock(config, StdRng::seed_from_u64(seed), SystemClock)
    }
}

impl<R: Rng, C: Clock> CdnEngine<R, C> {
    /// Creates an engine with an injected random source and clock.
    ///
    /// The catalog is seeded with the default four items stamped at the
    /// clock's current time.
    pub fn with_rng_and_clock(config: EngineConfig, rng: R, clock: C) -> Self {
        let now = clock.now();
        Self {
            registry: EdgeRegistry::default(),
            catalog: CatalogStore::with_defaults(now),
            metrics: TrafficMetrics::new(),
            config,
            rng,
            clock,
        }
    }

    /// Read access to the edge registry.
    pub fn registry(&self) -> &EdgeRegistry {
        &self.registry
    }

    /// Read access to the catalog.
    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// Read access to the metrics accumulator.
    pub fn metrics(&self) -> &TrafficMetrics {
        &self.metrics
    }

    /// Simulates one content request.
    ///
    /// Unknown content or location ids yield `None` with no side effects;
    /// that is a benign miss, not an error. On success the item's access
    /// counter is bumped, latency is drawn from the latency model, and the
    /// request is recorded in the metrics accumulator (crediting bandwidth
    /// on cache hits).
    pub fn request_content(
        &mut self,
        content_id: u64,
        location_id: &str,
    ) -> Option<RequestOutcome> {
        let location = match self.registry.find(location_id) {
            Some(loc) => loc.clone(),
            None => {
                debug!(location = location_id, "request for unknown edge");
                return None;
            }
        };
        let hour = self.clock.hour();

        let item = match self.catalog.find_mut(content_id) {
            Some(item) => item,
            None => {
                debug!(content = content_id, "request for unknown content");
                return None;
            }
        };

        item.access_count += 1;
        let cached = item.is_cached_at(location_id);
        let bandwidth_mb = if cached {
            match parse_size_mb(&item.size) {
                Some(mb) => mb,
                None => {
                    warn!(id = item.id, size = %item.size, "malformed size, no bandwidth credited");
                    0.0
                }
            }
        } else {
            0.0
        };
        let content = item.clone();

        let latency_ms = compute_latency(
            location.base_latency_ms,
            content.content_type,
            location_id,
            cached,
            hour,
            &mut self.rng,
        );
        self.metrics
            .record_request(cached, latency_ms as f64, bandwidth_mb);

        debug!(
            content = content_id,
            location = location_id,
            latency_ms,
            cached,
            "request simulated"
        );

        Some(RequestOutcome {
            content,
            location,
            latency_ms,
            cached,
        })
    }

    /// Simulates a request for a uniformly random (content, edge) pair.
    ///
    /// Returns `None` when the catalog or registry is empty.
    pub fn simulate_random_request(&mut self) -> Option<RequestOutcome> {
        if self.catalog.is_empty() || self.registry.is_empty() {
            return None;
        }
        let content_id = self.catalog.items()[self.rng.gen_range(0..self.catalog.len())].id;
        let location_id = self.registry.locations()[self.rng.gen_range(0..self.registry.len())]
            .id
            .clone();
        self.request_content(content_id, &location_id)
    }

    /// Caches content at an edge on demand.
    ///
    /// Returns true only when a new placement was recorded.
    pub fn cache_content(&mut self, content_id: u64, location_id: &str) -> bool {
        if self.registry.find(location_id).is_none() {
            debug!(location = location_id, "cache request for unknown edge");
            return false;
        }
        let added = self.catalog.add_cached_location(content_id, location_id);
        if added {
            debug!(content = content_id, location = location_id, "content cached");
        }
        added
    }

    /// Runs the popularity re-ranking pass.
    pub fn update_popularity(&mut self) -> usize {
        lifecycle::update_popularity(&mut self.catalog, &mut self.rng)
    }

    /// Runs the auto-cache pass for popular content.
    pub fn auto_cache_popular(&mut self) -> usize {
        lifecycle::auto_cache_popular(
            &mut self.catalog,
            &self.registry,
            self.config.auto_cache_threshold,
            &mut self.rng,
        )
    }

    /// Simulates a version bump on one random item.
    pub fn simulate_version_update(&mut self) -> Option<ContentItem> {
        let now = self.clock.now();
        lifecycle::simulate_version_update(&mut self.catalog, now, &mut self.rng)
    }

    /// Ingests one synthesized item, pruning if the catalog outgrows its
    /// ceiling.
    pub fn add_new_content(&mut self) -> ContentItem {
        let now = self.clock.now();
        let item = lifecycle::add_new_content(&mut self.catalog, now, &mut self.rng);
        let pruned = self.prune();
        if pruned > 0 {
            info!(pruned, len = self.catalog.len(), "catalog pruned after ingestion");
        }
        item
    }

    /// Prunes the catalog down to the configured target if it exceeds the
    /// ceiling. Returns the number of items removed.
    pub fn prune(&mut self) -> usize {
        lifecycle::prune_content_library(
            &mut self.catalog,
            self.config.catalog_ceiling,
            self.config.prune_target,
        )
    }

    /// Rolls the maintenance dice and runs at most one maintenance pass.
    pub fn run_maintenance_cycle(&mut self, weights: &MaintenanceWeights) -> MaintenanceAction {
        let roll: f64 = self.rng.gen();
        let action = if roll < weights.popularity {
            MaintenanceAction::Popularity {
                items: self.update_popularity(),
            }
        } else if roll < weights.popularity + weights.auto_cache {
            MaintenanceAction::AutoCache {
                placements: self.auto_cache_popular(),
            }
        } else if roll < weights.popularity + weights.auto_cache + weights.version_update {
            MaintenanceAction::VersionUpdate {
                updated: self.simulate_version_update().map(|item| item.id),
            }
        } else {
            MaintenanceAction::Idle
        };
        debug!(?action, "maintenance cycle");
        action
    }

    /// Restores the seed catalog and zeroes all metrics.
    pub fn reset(&mut self) {
        let now = self.clock.now();
        self.catalog.reset_to_defaults(now);
        self.metrics.reset();
        info!("simulation state reset to defaults");
    }

    /// Captures the full simulation state for the persistence collaborator.
    pub fn export_state(&self) -> crate::persist::SimState {
        crate::persist::SimState::new(self.metrics.snapshot(), self.catalog.items().to_vec())
    }

    /// Replaces catalog and metrics with a previously captured state.
    pub fn import_state(&mut self, state: crate::persist::SimState) {
        self.catalog = CatalogStore::new(state.content_library);
        self.metrics = state.metrics;
        info!(items = self.catalog.len(), "simulation state imported");
    }
}

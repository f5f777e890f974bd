//! Simulation daemon.
//!
//! The [`SimulationDaemon`] runs as an independent async task that:
//!
//! 1. Receives commands from the channel (sent by [`SimClient`](super::SimClient))
//! 2. Drives the periodic traffic, maintenance, and ingestion ticks
//! 3. Applies every mutation to the engine it owns
//! 4. Publishes a state snapshot for observers after each mutation
//!
//! # Design Notes
//!
//! The daemon owns the engine and is the only writer. Commands and interval
//! ticks are interleaved by a single `select!` loop, so every operation is
//! atomic with respect to the others without any locking inside the core.
//! Observers access state through a shared `RwLock` snapshot handle plus a
//! watch channel that carries a revision counter; they never block the
//! daemon.

use super::command::SimCommand;
use super::config::SimulationConfig;
use super::SimClient;
use crate::catalog::ContentItem;
use crate::clock::Clock;
use crate::metrics::TrafficMetrics;
use crate::sim::CdnEngine;
use rand::Rng;
use std::sync::{Arc, RwLock};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Shared state handle for read-only access by observers.
pub type SharedSimState = Arc<RwLock<SimSnapshot>>;

/// A consistent snapshot of the simulation state for observer access.
#[derive(Clone, Debug, Default)]
pub struct SimSnapshot {
    /// Aggregate traffic metrics.
    pub metrics: TrafficMetrics,
    /// The full catalog in insertion order.
    pub catalog: Vec<ContentItem>,
    /// Monotonic revision, bumped after every mutation.
    pub revision: u64,
}

/// The simulation daemon.
///
/// Processes commands and interval ticks sequentially and maintains the
/// published snapshot. Runs as an independent async task.
pub struct SimulationDaemon<R: Rng, C: Clock> {
    /// The engine, exclusively owned.
    engine: CdnEngine<R, C>,

    /// Channel receiver for incoming commands.
    rx: mpsc::UnboundedReceiver<SimCommand>,

    /// Daemon configuration.
    config: SimulationConfig,

    /// Shared snapshot handle for observers.
    shared: SharedSimState,

    /// Revision counter for the watch channel.
    revision: u64,

    /// Change-notification sender.
    watch_tx: watch::Sender<u64>,

    /// Prototype receiver kept so the channel never closes.
    watch_rx: watch::Receiver<u64>,
}

impl<R: Rng, C: Clock> SimulationDaemon<R, C> {
    /// Creates a daemon over the given engine and returns it with a
    /// connected client.
    pub fn new(engine: CdnEngine<R, C>, config: SimulationConfig) -> (Self, SimClient) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (watch_tx, watch_rx) = watch::channel(0);

        let mut daemon = Self {
            engine,
            rx,
            config,
            shared: Arc::new(RwLock::new(SimSnapshot::default())),
            revision: 0,
            watch_tx,
            watch_rx,
        };
        // Publish the seed state so observers never see an empty snapshot.
        daemon.publish();

        (daemon, SimClient::new(tx))
    }

    /// Returns a handle to the shared snapshot.
    pub fn state_handle(&self) -> SharedSimState {
        Arc::clone(&self.shared)
    }

    /// Returns a receiver notified after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.watch_rx.clone()
    }

    /// Runs the daemon until shutdown is signaled.
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(
            traffic_secs = self.config.traffic_interval.as_secs_f64(),
            maintenance_secs = self.config.maintenance_interval.as_secs_f64(),
            ingest_secs = self.config.ingest_interval.as_secs_f64(),
            "simulation daemon starting"
        );

        let mut traffic = tokio::time::interval(self.config.traffic_interval);
        let mut maintenance = tokio::time::interval(self.config.maintenance_interval);
        let mut ingest = tokio::time::interval(self.config.ingest_interval);
        // Don't let missed ticks pile up
        traffic.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        maintenance.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        ingest.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // Skip the immediate first tick of each interval
        traffic.tick().await;
        maintenance.tick().await;
        ingest.tick().await;

        loop {
            tokio::select! {
                biased;

                // Check shutdown first
                _ = shutdown.cancelled() => {
                    info!("simulation daemon shutting down");
                    break;
                }

                // Process incoming commands
                Some(command) = self.rx.recv() => {
                    self.apply(command);
                    self.publish();
                }

                // Generate background traffic
                _ = traffic.tick() => {
                    self.engine.simulate_random_request();
                    self.publish();
                }

                // Roll the maintenance dice
                _ = maintenance.tick() => {
                    self.engine.run_maintenance_cycle(&self.config.weights);
                    self.publish();
                }

                // Grow the catalog
                _ = ingest.tick() => {
                    self.engine.add_new_content();
                    self.publish();
                }
            }
        }

        // Final snapshot before shutdown
        self.publish();
        debug!("simulation daemon stopped");
    }

    /// Applies a single command to the engine.
    fn apply(&mut self, command: SimCommand) {
        debug!(command = command.command_type(), "applying command");
        match command {
            SimCommand::RequestContent {
                content_id,
                location_id,
            } => {
                self.engine.request_content(content_id, &location_id);
            }
            SimCommand::CacheContent {
                content_id,
                location_id,
            } => {
                self.engine.cache_content(content_id, &location_id);
            }
            SimCommand::UpdatePopularity => {
                self.engine.update_popularity();
            }
            SimCommand::AutoCachePopular => {
                self.engine.auto_cache_popular();
            }
            SimCommand::VersionUpdate => {
                self.engine.simulate_version_update();
            }
            SimCommand::AddContent => {
                self.engine.add_new_content();
            }
            SimCommand::Prune => {
                self.engine.prune();
            }
            SimCommand::Reset => {
                self.engine.reset();
            }
        }
    }

    /// Publishes the current engine state for observers.
    fn publish(&mut self) {
        self.revision += 1;
        if let Ok(mut guard) = self.shared.write() {
            guard.metrics = self.engine.metrics().snapshot();
            guard.catalog = self.engine.catalog().items().to_vec();
            guard.revision = self.revision;
        }
        // Never fails: the daemon keeps a receiver alive.
        self.watch_tx.send_replace(self.revision);
    }
}

impl<R: Rng, C: Clock> std::fmt::Debug for SimulationDaemon<R, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationDaemon")
            .field("revision", &self.revision)
            .field("catalog_len", &self.engine.catalog().len())
            .field("total_requests", &self.engine.metrics().total_requests)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::sim::EngineConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::time::Duration;

    fn create_daemon() -> (
        SimulationDaemon<ChaCha8Rng, FixedClock>,
        SimClient,
    ) {
        let engine = CdnEngine::with_rng_and_clock(
            EngineConfig::default(),
            ChaCha8Rng::seed_from_u64(1),
            FixedClock::at_hour(12),
        );
        SimulationDaemon::new(engine, SimulationConfig::default())
    }

    #[test]
    fn new_daemon_publishes_seed_snapshot() {
        let (daemon, _client) = create_daemon();
        let handle = daemon.state_handle();

        let snapshot = handle.read().unwrap().clone();
        assert_eq!(snapshot.catalog.len(), 4);
        assert_eq!(snapshot.metrics.total_requests, 0);
        assert_eq!(snapshot.revision, 1);
    }

    #[test]
    fn apply_request_content_updates_metrics() {
        let (mut daemon, _client) = create_daemon();

        daemon.apply(SimCommand::RequestContent {
            content_id: 1,
            location_id: "us-east".to_string(),
        });
        daemon.publish();

        let snapshot = daemon.state_handle().read().unwrap().clone();
        assert_eq!(snapshot.metrics.total_requests, 1);
        assert_eq!(snapshot.metrics.cache_hits, 1);
    }

    #[test]
    fn apply_reset_restores_seed_state() {
        let (mut daemon, _client) = create_daemon();

        daemon.apply(SimCommand::AddContent);
        daemon.apply(SimCommand::RequestContent {
            content_id: 2,
            location_id: "ap-south".to_string(),
        });
        daemon.apply(SimCommand::Reset);
        daemon.publish();

        let snapshot = daemon.state_handle().read().unwrap().clone();
        assert_eq!(snapshot.catalog.len(), 4);
        assert_eq!(snapshot.metrics.total_requests, 0);
    }

    #[test]
    fn publish_bumps_watch_revision() {
        let (mut daemon, _client) = create_daemon();
        let mut rx = daemon.subscribe();

        let before = *rx.borrow_and_update();
        daemon.publish();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), before + 1);
    }

    #[tokio::test]
    async fn daemon_processes_commands_and_shuts_down() {
        let engine = CdnEngine::with_rng_and_clock(
            EngineConfig::default(),
            ChaCha8Rng::seed_from_u64(5),
            FixedClock::at_hour(10),
        );
        // Long intervals: only explicit commands mutate state in this test.
        let config = SimulationConfig::default()
            .with_traffic_interval(Duration::from_secs(3600))
            .with_maintenance_interval(Duration::from_secs(3600))
            .with_ingest_interval(Duration::from_secs(3600));

        let (daemon, client) = SimulationDaemon::new(engine, config);
        let handle = daemon.state_handle();
        let shutdown = CancellationToken::new();

        client.request_content(1, "us-east");
        client.request_content(4, "us-east");

        let shutdown_clone = shutdown.clone();
        let daemon_task = tokio::spawn(async move {
            daemon.run(shutdown_clone).await;
        });

        // Give it time to process the commands
        tokio::time::sleep(Duration::from_millis(100)).await;

        shutdown.cancel();
        daemon_task.await.unwrap();

        let snapshot = handle.read().unwrap().clone();
        assert_eq!(snapshot.metrics.total_requests, 2);
        assert_eq!(snapshot.metrics.cache_hits, 1);
        assert_eq!(snapshot.metrics.cache_misses, 1);
    }

    #[tokio::test]
    async fn daemon_generates_traffic_on_its_own() {
        let engine = CdnEngine::with_rng_and_clock(
            EngineConfig::default(),
            ChaCha8Rng::seed_from_u64(8),
            FixedClock::at_hour(10),
        );
        let config = SimulationConfig::default()
            .with_traffic_interval(Duration::from_millis(10))
            .with_maintenance_interval(Duration::from_secs(3600))
            .with_ingest_interval(Duration::from_secs(3600));

        let (daemon, _client) = SimulationDaemon::new(engine, config);
        let handle = daemon.state_handle();
        let shutdown = CancellationToken::new();

        let shutdown_clone = shutdown.clone();
        let daemon_task = tokio::spawn(async move {
            daemon.run(shutdown_clone).await;
        });

        tokio::time::sleep(Duration::from_millis(200)).await;
        shutdown.cancel();
        daemon_task.await.unwrap();

        let snapshot = handle.read().unwrap().clone();
        assert!(
            snapshot.metrics.total_requests > 0,
            "no background traffic generated"
        );
        assert_eq!(
            snapshot.metrics.cache_hits + snapshot.metrics.cache_misses,
            snapshot.metrics.total_requests
        );
    }
}

//! Simulation service: command plumbing, the daemon, and a facade.
//!
//! This module provides a 3-layer architecture for driving the simulation:
//!
//! 1. **Command Layer** ([`SimClient`]) - Fire-and-forget command emission
//! 2. **Execution Layer** ([`SimulationDaemon`]) - Sequential single-writer
//!    processing of commands and periodic ticks
//! 3. **Observation Layer** ([`SimSnapshot`]) - Published state snapshots
//!    plus a watch channel for change notification
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  COMMAND LAYER                                                   │
//! │  SimClient (cloneable, cheap, fire-and-forget)                  │
//! │  - Used by: CLI, external schedulers, UIs                       │
//! └─────────────────────────────┬───────────────────────────────────┘
//! │                             │ SimCommand (mpsc channel)
//! │                             ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  EXECUTION LAYER                                                 │
//! │  SimulationDaemon (independent async task)                       │
//! │  - Owns the CdnEngine (single writer)                           │
//! │  - Interleaves commands with traffic/maintenance/ingest ticks   │
//! └─────────────────────────────┬───────────────────────────────────┘
//! │                             │ snapshot + revision watch
//! │                             ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  OBSERVATION LAYER                                               │
//! │  SimSnapshot behind Arc<RwLock>, watch::Receiver<u64>           │
//! │  - Read-only; observers never touch the engine                  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod client;
mod command;
mod config;
mod daemon;
mod error;

pub use client::SimClient;
pub use command::SimCommand;
pub use config::{
    SimulationConfig, DEFAULT_INGEST_INTERVAL_SECS, DEFAULT_MAINTENANCE_INTERVAL_SECS,
    DEFAULT_TRAFFIC_INTERVAL_SECS,
};
pub use daemon::{SharedSimState, SimSnapshot, SimulationDaemon};
pub use error::ServiceError;

use crate::clock::Clock;
use crate::sim::CdnEngine;
use rand::Rng;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

// =============================================================================
// Simulation System
// =============================================================================

/// The complete simulation system.
///
/// This is the top-level factory that creates and manages the daemon. It
/// provides:
///
/// - A [`SimClient`] for sending commands
/// - Access to state snapshots for observation
/// - Graceful shutdown coordination
///
/// # Example
///
/// ```ignore
/// let system = SimulationSystem::new(&runtime.handle(), SimulationConfig::default())?;
/// let client = system.client();
///
/// client.request_content(1, "us-east");
///
/// let snapshot = system.snapshot();
/// println!("{} requests", snapshot.metrics.total_requests);
/// ```
pub struct SimulationSystem {
    /// Client for sending commands.
    client: SimClient,

    /// Handle to the shared snapshot for observers.
    state_handle: SharedSimState,

    /// Change-notification receiver prototype.
    watch_rx: watch::Receiver<u64>,

    /// Handle to the daemon task.
    daemon_handle: Option<JoinHandle<()>>,

    /// Shutdown signal for the daemon.
    shutdown: CancellationToken,
}

impl SimulationSystem {
    /// Creates a simulation system with a default engine and starts the
    /// daemon on the provided runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::ConfigError`] when the configuration fails
    /// validation.
    pub fn new(
        runtime_handle: &tokio::runtime::Handle,
        config: SimulationConfig,
    ) -> Result<Self, ServiceError> {
        config.validate().map_err(ServiceError::ConfigError)?;
        let engine = CdnEngine::new(config.engine.clone());
        Ok(Self::spawn(runtime_handle, config, engine))
    }

    /// Creates a simulation system over an injected engine.
    ///
    /// Used by tests to pin the RNG seed and the clock.
    pub fn with_engine<R, C>(
        runtime_handle: &tokio::runtime::Handle,
        config: SimulationConfig,
        engine: CdnEngine<R, C>,
    ) -> Result<Self, ServiceError>
    where
        R: Rng + Send + 'static,
        C: Clock + 'static,
    {
        config.validate().map_err(ServiceError::ConfigError)?;
        Ok(Self::spawn(runtime_handle, config, engine))
    }

    fn spawn<R, C>(
        runtime_handle: &tokio::runtime::Handle,
        config: SimulationConfig,
        engine: CdnEngine<R, C>,
    ) -> Self
    where
        R: Rng + Send + 'static,
        C: Clock + 'static,
    {
        let (daemon, client) = SimulationDaemon::new(engine, config);
        let state_handle = daemon.state_handle();
        let watch_rx = daemon.subscribe();
        let shutdown = CancellationToken::new();

        let daemon_shutdown = shutdown.clone();
        let daemon_handle = Some(runtime_handle.spawn(async move {
            daemon.run(daemon_shutdown).await;
        }));

        Self {
            client,
            state_handle,
            watch_rx,
            daemon_handle,
            shutdown,
        }
    }

    /// Returns a clone of the command client.
    pub fn client(&self) -> SimClient {
        self.client.clone()
    }

    /// Returns a handle to the shared snapshot state.
    pub fn state_handle(&self) -> SharedSimState {
        SharedSimState::clone(&self.state_handle)
    }

    /// Returns a consistent copy of the current snapshot.
    pub fn snapshot(&self) -> SimSnapshot {
        self.state_handle
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Returns a receiver notified after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.watch_rx.clone()
    }

    /// Shuts down the simulation gracefully.
    ///
    /// This signals the daemon to stop and waits for it to complete.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.daemon_handle.take() {
            let _ = handle.await;
        }
    }

    /// Returns true if the daemon is still running.
    pub fn is_running(&self) -> bool {
        self.daemon_handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for SimulationSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationSystem")
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn system_starts_and_shuts_down() {
        let config = SimulationConfig::default();
        let system = SimulationSystem::new(&tokio::runtime::Handle::current(), config).unwrap();

        assert!(system.is_running());
        let snapshot = system.snapshot();
        assert_eq!(snapshot.catalog.len(), 4);

        system.shutdown().await;
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let config = SimulationConfig::default().with_traffic_interval(Duration::ZERO);
        let result = SimulationSystem::new(&tokio::runtime::Handle::current(), config);
        assert!(matches!(result, Err(ServiceError::ConfigError(_))));
    }

    #[tokio::test]
    async fn commands_flow_through_to_snapshots() {
        let config = SimulationConfig::default()
            .with_traffic_interval(Duration::from_secs(3600))
            .with_maintenance_interval(Duration::from_secs(3600))
            .with_ingest_interval(Duration::from_secs(3600));
        let system = SimulationSystem::new(&tokio::runtime::Handle::current(), config).unwrap();

        let mut changes = system.subscribe();
        changes.borrow_and_update();

        system.client().request_content(1, "us-east");

        tokio::time::timeout(Duration::from_secs(2), changes.changed())
            .await
            .expect("snapshot change notification")
            .unwrap();

        let snapshot = system.snapshot();
        assert_eq!(snapshot.metrics.total_requests, 1);

        system.shutdown().await;
    }
}

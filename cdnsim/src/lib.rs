//! cdnsim - Simulated content-delivery network
//!
//! This library models the behavior of a CDN for demonstration and
//! visualization purposes: a registry of synthetic edge locations, a content
//! catalog with cache/version/popularity state, and a traffic engine that
//! updates cache state, latency and aggregate metrics over time.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides a simplified facade:
//!
//! ```ignore
//! use cdnsim::service::{SimulationConfig, SimulationSystem};
//!
//! let system = SimulationSystem::new(&runtime.handle(), SimulationConfig::default())?;
//!
//! // Fire-and-forget commands
//! let client = system.client();
//! client.request_content(1, "us-east");
//!
//! // Read-only observation
//! let snapshot = system.snapshot();
//! println!("{} requests so far", snapshot.metrics.total_requests);
//! ```
//!
//! Nothing in here talks to a real network. Latency, cache hits and
//! bandwidth figures are all synthetic, produced by the models in [`sim`].

pub mod catalog;
pub mod clock;
pub mod edge;
pub mod logging;
pub mod metrics;
pub mod persist;
pub mod service;
pub mod sim;

/// Version of the cdnsim library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

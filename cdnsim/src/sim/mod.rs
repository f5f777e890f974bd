//! The simulation core: latency model, lifecycle maintenance, and the
//! engine that owns all mutable state.

pub mod engine;
pub mod latency;
pub mod lifecycle;

pub use engine::{
    CdnEngine, EngineConfig, MaintenanceAction, MaintenanceWeights, RequestOutcome,
};
pub use latency::compute_latency;

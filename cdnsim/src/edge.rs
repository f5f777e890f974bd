//! Edge location registry.
//!
//! Edge locations are the simulated points of presence of the CDN. Each has
//! a fixed base latency that anchors the latency model, and a status flag.
//! The registry is reference data: it is built once at startup and never
//! mutated afterwards, so lookups borrow and nothing is locked.

use serde::{Deserialize, Serialize};

/// Operational status of an edge location.
///
/// Only `Active` is currently exercised by the simulation; the other
/// variants exist so catalog data round-trips the full status vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStatus {
    Active,
    Degraded,
    Offline,
}

/// A simulated point of presence with a fixed base latency to origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeLocation {
    /// Unique key, e.g. "us-east".
    pub id: String,
    /// Human-readable name, e.g. "US East (N. Virginia)".
    pub name: String,
    /// Base latency in milliseconds. Always positive.
    #[serde(rename = "latency")]
    pub base_latency_ms: u32,
    /// Operational status.
    pub status: EdgeStatus,
}

impl EdgeLocation {
    fn new(id: &str, name: &str, base_latency_ms: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            base_latency_ms,
            status: EdgeStatus::Active,
        }
    }
}

/// Read-only lookup table of edge locations.
#[derive(Debug, Clone)]
pub struct EdgeRegistry {
    locations: Vec<EdgeLocation>,
}

impl EdgeRegistry {
    /// Creates a registry over the given locations.
    pub fn new(locations: Vec<EdgeLocation>) -> Self {
        Self { locations }
    }

    /// Finds a location by id.
    pub fn find(&self, id: &str) -> Option<&EdgeLocation> {
        self.locations.iter().find(|loc| loc.id == id)
    }

    /// Returns all locations in registration order.
    pub fn locations(&self) -> &[EdgeLocation] {
        &self.locations
    }

    /// Returns the number of registered locations.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Returns true if the registry has no locations.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl Default for EdgeRegistry {
    fn default() -> Self {
        Self::new(default_edge_locations())
    }
}

/// The six simulated edge locations around the world.
pub fn default_edge_locations() -> Vec<EdgeLocation> {
    vec![
        EdgeLocation::new("us-east", "US East (N. Virginia)", 35),
        EdgeLocation::new("us-west", "US West (Oregon)", 75),
        EdgeLocation::new("eu-west", "Europe (Ireland)", 120),
        EdgeLocation::new("ap-south", "Asia Pacific (Mumbai)", 180),
        EdgeLocation::new("ap-northeast", "Asia Pacific (Tokyo)", 160),
        EdgeLocation::new("sa-east", "South America (São Paulo)", 140),
    ]
}

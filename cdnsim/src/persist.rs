//! State snapshot persistence.
//!
//! The persistence collaborator is outside the core: on demand it captures
//! the current metrics and catalog as a JSON record and restores them
//! later. Field names match the wire vocabulary of the original data set
//! (`cdnMetrics`-style camelCase on the metrics, `contentLibrary` for the
//! catalog).

use crate::catalog::ContentItem;
use crate::metrics::TrafficMetrics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Persistence errors.
#[derive(Debug, Error)]
pub enum PersistError {
    /// I/O error reading or writing the state file
    #[error("state file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// State file contents are not valid JSON for a snapshot
    #[error("state file parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A JSON-serializable snapshot of the whole simulation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimState {
    /// Aggregate traffic metrics.
    pub metrics: TrafficMetrics,
    /// The full catalog in insertion order.
    pub content_library: Vec<ContentItem>,
}

impl SimState {
    /// Captures a snapshot from the given parts.
    pub fn new(metrics: TrafficMetrics, content_library: Vec<ContentItem>) -> Self {
        Self {
            metrics,
            content_library,
        }
    }

    /// The fixed seed state: zeroed metrics and the four-item catalog.
    pub fn seed(now: DateTime<Utc>) -> Self {
        Self {
            metrics: TrafficMetrics::new(),
            content_library: crate::catalog::default_content_items(now),
        }
    }
}

/// Writes a snapshot to `path` as pretty-printed JSON.
pub fn save_state(path: &Path, state: &SimState) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json)?;
    Ok(())
}

/// Reads a snapshot previously written with [`save_state`].
pub fn load_state(path: &Path) -> Result<SimState, PersistError> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn test_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn seed_state_is_zeroed_four_items() {
        let state = SimState::seed(test_now());
        assert_eq!(state.metrics, TrafficMetrics::new());
        assert_eq!(state.content_library.len(), 4);
    }

    #[test]
    fn save_and_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cdn-state.json");

        let mut state = SimState::seed(test_now());
        state.metrics.record_request(true, 42.0, 1.8);

        save_state(&path, &state).unwrap();
        let loaded = load_state(&path).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn state_json_uses_wire_field_names() {
        let state = SimState::seed(test_now());
        let json = serde_json::to_value(&state).unwrap();

        assert!(json.get("metrics").is_some());
        assert!(json.get("contentLibrary").is_some());
        assert_eq!(json["metrics"]["totalRequests"], 0);
        assert_eq!(json["contentLibrary"][0]["type"], "image");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_state(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, PersistError::Io(_)));
    }

    #[test]
    fn load_garbage_is_json_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("garbage.json");
        fs::write(&path, "not json at all").unwrap();
        let err = load_state(&path).unwrap_err();
        assert!(matches!(err, PersistError::Json(_)));
    }
}

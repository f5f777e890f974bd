//! Content item types and size/version helpers.
//!
//! A [`ContentItem`] is one entry in the simulated catalog. Sizes are kept
//! as the human-readable magnitude strings the original data set uses
//! ("1.8MB", "320KB") and only converted to numeric megabytes at the point
//! a bandwidth figure is needed. Versions are one-decimal strings that only
//! ever move forward.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of content served by the CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Image,
    Video,
    Static,
    Api,
}

impl ContentType {
    /// Human-readable name of the type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Image => "Images",
            Self::Video => "Videos",
            Self::Static => "Static Assets",
            Self::Api => "API Responses",
        }
    }

    /// Typical object size for this type, as shown in the catalog UI.
    pub fn typical_size(&self) -> &'static str {
        match self {
            Self::Image => "2MB",
            Self::Video => "50MB",
            Self::Static => "500KB",
            Self::Api => "10KB",
        }
    }

    /// Default edge cache lifetime for this type.
    pub fn default_cache_time(&self) -> &'static str {
        match self {
            Self::Image => "7 days",
            Self::Video => "3 days",
            Self::Static => "30 days",
            Self::Api => "1 hour",
        }
    }
}

/// One entry in the content catalog.
///
/// The `cached` flag is derived state: it is true exactly when `locations`
/// is non-empty, and every mutation path keeps it in sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Unique id, assigned monotonically.
    pub id: u64,
    /// Content kind.
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Object name, e.g. "hero-banner.jpg".
    pub name: String,
    /// Human-readable size with KB/MB unit, e.g. "1.8MB".
    pub size: String,
    /// True when the item is cached at one or more edges.
    pub cached: bool,
    /// Edge location ids where the item is currently cached.
    pub locations: Vec<String>,
    /// Popularity score in [1, 100].
    pub popularity: u8,
    /// One-decimal version string, monotonically non-decreasing.
    pub version: String,
    /// Last content update (version bump) time.
    pub last_updated: DateTime<Utc>,
    /// Original ingestion time.
    pub uploaded_at: DateTime<Utc>,
    /// Requests seen since the last popularity cycle.
    pub access_count: u64,
}

impl ContentItem {
    /// Creates a new item with no cache placements.
    pub fn new(
        id: u64,
        content_type: ContentType,
        name: impl Into<String>,
        size: impl Into<String>,
        popularity: u8,
        now: DateTime<Utc>,
    ) -> Self {
        debug_assert!((1..=100).contains(&popularity));
        Self {
            id,
            content_type,
            name: name.into(),
            size: size.into(),
            cached: false,
            locations: Vec::new(),
            popularity,
            version: "1.0".to_string(),
            last_updated: now,
            uploaded_at: now,
            access_count: 0,
        }
    }

    /// Seeds the item's initial cache placements.
    pub fn with_locations(mut self, locations: &[&str]) -> Self {
        self.locations = locations.iter().map(|s| s.to_string()).collect();
        self.cached = !self.locations.is_empty();
        self
    }

    /// Returns true if the item is cached at the given edge.
    pub fn is_cached_at(&self, location_id: &str) -> bool {
        self.locations.iter().any(|loc| loc == location_id)
    }

    /// Adds a cache placement if not already present.
    ///
    /// Returns true if the placement was added.
    pub fn add_location(&mut self, location_id: &str) -> bool {
        if self.is_cached_at(location_id) {
            return false;
        }
        self.locations.push(location_id.to_string());
        self.cached = true;
        true
    }

    /// Removes every cache placement. A new version invalidates all edge
    /// copies.
    pub fn clear_locations(&mut self) {
        self.locations.clear();
        self.cached = false;
    }

    /// Applies a bounded popularity delta, clamping to [1, 100].
    pub fn adjust_popularity(&mut self, delta: i16) {
        let adjusted = (self.popularity as i16 + delta).clamp(1, 100);
        self.popularity = adjusted as u8;
    }
}

/// Parses a "1.8MB" / "320KB" style size string into megabytes.
///
/// KB values are divided by 1000 to match the original accounting. Strings
/// without a recognized unit or with a non-numeric magnitude yield `None`.
pub fn parse_size_mb(size: &str) -> Option<f64> {
    let size = size.trim();
    if let Some(magnitude) = size.strip_suffix("MB") {
        return magnitude.trim().parse::<f64>().ok().filter(|mb| *mb >= 0.0);
    }
    if let Some(magnitude) = size.strip_suffix("KB") {
        return magnitude
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|kb| *kb >= 0.0)
            .map(|kb| kb / 1000.0);
    }
    None
}

/// Scales a size string by the given factor, keeping the original unit and
/// formatting the magnitude to one decimal place.
///
/// Returns `None` when the size string does not parse.
pub fn scale_size(size: &str, factor: f64) -> Option<String> {
    let size = size.trim();
    let (magnitude, unit) = if let Some(m) = size.strip_suffix("MB") {
        (m, "MB")
    } else if let Some(m) = size.strip_suffix("KB") {
        (m, "KB")
    } else {
        return None;
    };
    let value = magnitude.trim().parse::<f64>().ok()?;
    Some(format!("{:.1}{}", value * factor, unit))
}

/// Advances a one-decimal version string by 0.1.
///
/// An unparseable version is treated as "1.0", matching the original data
/// set's fallback.
pub fn bump_version(version: &str) -> String {
    let current = version.trim().parse::<f64>().unwrap_or(1.0);
    format!("{:.1}", current + 0.1)
}

//! Seed catalog data.
//!
//! The four seed items mirror the original demo data set. Popularity scores
//! are fixed so resets are reproducible; item 4 is deliberately uncached so
//! a fresh catalog can demonstrate a cache miss immediately.

use super::item::{ContentItem, ContentType};
use chrono::{DateTime, Utc};

/// Builds the default four-item catalog.
///
/// Both timestamps of every item are set to `now`.
pub fn default_content_items(now: DateTime<Utc>) -> Vec<ContentItem> {
    vec![
        ContentItem::new(1, ContentType::Image, "hero-banner.jpg", "1.8MB", 85, now)
            .with_locations(&["us-east", "us-west", "eu-west"]),
        ContentItem::new(2, ContentType::Video, "product-demo.mp4", "45MB", 70, now)
            .with_locations(&["us-east", "ap-south"]),
        ContentItem::new(3, ContentType::Static, "main.js", "320KB", 95, now).with_locations(&[
            "us-east",
            "us-west",
            "eu-west",
            "ap-south",
            "ap-northeast",
            "sa-east",
        ]),
        ContentItem::new(4, ContentType::Api, "user-data.json", "8KB", 40, now),
    ]
}

//! Popularity and lifecycle maintenance.
//!
//! Four independent passes the scheduler runs periodically over the
//! catalog: popularity re-ranking from access counts, auto-caching of
//! popular items at more edges, simulated version bumps, and new-content
//! ingestion with size-bounded pruning. Each pass is idempotent in
//! isolation and a no-op on an empty catalog.
//!
//! Ranking ties are broken by insertion order (the sort is stable), and
//! pruning uses the store's eviction order: popularity ascending, then
//! last-updated ascending, then id. Both tie-breaks are deterministic so
//! replays with a seeded RNG reproduce the same catalog.

use crate::catalog::{bump_version, scale_size, CatalogStore, ContentItem, ContentType};
use crate::edge::EdgeRegistry;
use chrono::{DateTime, Utc};
use rand::Rng;
use std::cmp::Reverse;
use tracing::{debug, warn};

/// Re-ranks popularity from access counts and resets the counters.
///
/// Items are ranked by access count descending. The top 20% gain +1..=3
/// popularity, the middle 60% take a -1..=1 random walk, and the bottom
/// 20% decay by 0..=1; all adjustments clamp to [1, 100]. Every access
/// count is then reset for the next cycle.
///
/// Returns the number of items re-ranked.
pub fn update_popularity<R: Rng>(catalog: &mut CatalogStore, rng: &mut R) -> usize {
    let len = catalog.len();
    if len == 0 {
        debug!("popularity pass skipped: catalog empty");
        return 0;
    }

    let items = catalog.items_mut();

    // Stable sort: equal access counts keep insertion order.
    let mut ranked: Vec<usize> = (0..len).collect();
    ranked.sort_by_key(|&i| Reverse(items[i].access_count));

    let top_n = len.div_ceil(5);
    let bottom_n = len.div_ceil(5).min(len - top_n);

    for (rank, &idx) in ranked.iter().enumerate() {
        let delta: i16 = if rank < top_n {
            rng.gen_range(1..=3)
        } else if rank >= len - bottom_n {
            -rng.gen_range(0..=1)
        } else {
            rng.gen_range(-1..=1)
        };
        items[idx].adjust_popularity(delta);
    }

    for item in items.iter_mut() {
        item.access_count = 0;
    }

    len
}

/// Caches popular items at additional edges.
///
/// Every item whose popularity exceeds `threshold` gets a target placement
/// count of `ceil(popularity / 100 * edge_count)`. Items below target pick
/// uncached edges uniformly without replacement until the target is met or
/// no edges remain.
///
/// Returns the number of new placements.
pub fn auto_cache_popular<R: Rng>(
    catalog: &mut CatalogStore,
    registry: &EdgeRegistry,
    threshold: u8,
    rng: &mut R,
) -> usize {
    if catalog.is_empty() || registry.is_empty() {
        return 0;
    }

    let edge_count = registry.len();
    let mut placements = 0;

    for item in catalog.items_mut() {
        if item.popularity <= threshold {
            continue;
        }

        let target = ((item.popularity as f64 / 100.0) * edge_count as f64).ceil() as usize;
        if item.locations.len() >= target {
            continue;
        }

        let mut candidates: Vec<&str> = registry
            .locations()
            .iter()
            .map(|loc| loc.id.as_str())
            .filter(|id| !item.is_cached_at(id))
            .collect();

        while item.locations.len() < target && !candidates.is_empty() {
            let pick = rng.gen_range(0..candidates.len());
            let edge = candidates.swap_remove(pick);
            if item.add_location(edge) {
                placements += 1;
            }
        }
    }

    if placements > 0 {
        debug!(placements, "auto-cached popular content");
    }
    placements
}

/// Simulates a content update on one random catalog item.
///
/// Bumps the version by 0.1, perturbs the size by a uniform factor in
/// [0.95, 1.05] keeping the unit, stamps `last_updated`, and clears all
/// cache placements: a new version invalidates every edge copy.
///
/// Returns the updated item, or `None` on an empty catalog.
pub fn simulate_version_update<R: Rng>(
    catalog: &mut CatalogStore,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Option<ContentItem> {
    if catalog.is_empty() {
        return None;
    }

    let idx = rng.gen_range(0..catalog.len());
    let factor = rng.gen_range(0.95..=1.05);

    let item = &mut catalog.items_mut()[idx];
    item.version = bump_version(&item.version);
    match scale_size(&item.size, factor) {
        Some(scaled) => item.size = scaled,
        None => warn!(id = item.id, size = %item.size, "unparseable size left untouched"),
    }
    item.last_updated = now;
    item.clear_locations();

    debug!(id = item.id, version = %item.version, "content version updated");
    Some(item.clone())
}

/// Synthesizes and appends a new catalog item.
///
/// The type is drawn from a weighted distribution (static 35%, image 35%,
/// video 20%, api 10%); name and size are generated appropriately for the
/// type. New items start uncached with popularity 1..=30, version "1.0",
/// and an access count of zero.
pub fn add_new_content<R: Rng>(
    catalog: &mut CatalogStore,
    now: DateTime<Utc>,
    rng: &mut R,
) -> ContentItem {
    let id = catalog.next_id();
    let content_type = roll_content_type(rng);
    let name = synthesize_name(content_type, id, rng);
    let size = synthesize_size(content_type, rng);
    let popularity = rng.gen_range(1..=30);

    let item = ContentItem::new(id, content_type, name, size, popularity, now);
    catalog.insert(item.clone());
    debug!(id, name = %item.name, "new content ingested");
    item
}

/// Prunes the catalog down to `target` items once it exceeds `ceiling`.
///
/// Eviction order is the store's: least popular and oldest first. Returns
/// the number of items removed.
pub fn prune_content_library(catalog: &mut CatalogStore, ceiling: usize, target: usize) -> usize {
    if catalog.len() <= ceiling {
        return 0;
    }

    let excess = catalog.len().saturating_sub(target);
    let removed = catalog.remove_oldest(excess);
    debug!(removed = removed.len(), "catalog pruned");
    removed.len()
}

fn roll_content_type<R: Rng>(rng: &mut R) -> ContentType {
    let roll: f64 = rng.gen();
    if roll < 0.35 {
        ContentType::Static
    } else if roll < 0.70 {
        ContentType::Image
    } else if roll < 0.90 {
        ContentType::Video
    } else {
        ContentType::Api
    }
}

fn synthesize_name<R: Rng>(content_type: ContentType, id: u64, rng: &mut R) -> String {
    fn pick<'a, R: Rng>(rng: &mut R, pool: &[&'a str]) -> &'a str {
        pool[rng.gen_range(0..pool.len())]
    }

    match content_type {
        ContentType::Image => {
            let stem = pick(rng, &["hero-banner", "product-photo", "gallery", "thumbnail"]);
            let ext = pick(rng, &["jpg", "png", "webp"]);
            format!("{stem}-{id}.{ext}")
        }
        ContentType::Video => {
            let stem = pick(rng, &["product-demo", "tutorial", "promo", "walkthrough"]);
            format!("{stem}-{id}.mp4")
        }
        ContentType::Static => {
            let stem = pick(rng, &["main", "vendor", "styles", "runtime"]);
            let ext = pick(rng, &["js", "css"]);
            format!("{stem}-{id}.{ext}")
        }
        ContentType::Api => {
            let stem = pick(rng, &["user-data", "session", "catalog", "search-results"]);
            format!("{stem}-{id}.json")
        }
    }
}

fn synthesize_size<R: Rng>(content_type: ContentType, rng: &mut R) -> String {
    match content_type {
        ContentType::Image => format!("{:.1}MB", rng.gen_range(0.5..5.0)),
        ContentType::Video => format!("{}MB", rng.gen_range(10..90)),
        ContentType::Static => format!("{}KB", rng.gen_range(50..900)),
        ContentType::Api => format!("{}KB", rng.gen_range(1..50)),
    }
}

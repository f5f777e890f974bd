//! The catalog store.
//!
//! Owns the list of [`ContentItem`]s in insertion order. All mutations are
//! in-place on the single store instance; an unknown id is a no-op or a
//! `false` return, never an error. There is exactly one writer (the
//! simulation engine), so no interior locking is needed here.

use super::item::ContentItem;
use super::seed::default_content_items;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Mutable store of catalog entries, ordered by insertion.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    items: Vec<ContentItem>,
}

impl CatalogStore {
    /// Creates a store seeded with the default four-item catalog.
    pub fn with_defaults(now: DateTime<Utc>) -> Self {
        Self {
            items: default_content_items(now),
        }
    }

    /// Creates a store over the given items.
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self { items }
    }

    /// Creates an empty store.
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    /// Finds an item by id.
    pub fn find(&self, id: u64) -> Option<&ContentItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Finds an item by id for mutation.
    pub fn find_mut(&mut self, id: u64) -> Option<&mut ContentItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Returns all items in insertion order.
    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    /// Returns all items in insertion order, mutably.
    ///
    /// Used by the lifecycle maintenance passes, which rank and adjust the
    /// whole catalog in one sweep.
    pub fn items_mut(&mut self) -> &mut [ContentItem] {
        &mut self.items
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Records a new cache placement for an item.
    ///
    /// Returns true and appends only when the item exists and is not yet
    /// cached at that edge; false when it is already cached there or the id
    /// is unknown.
    pub fn add_cached_location(&mut self, id: u64, location_id: &str) -> bool {
        match self.find_mut(id) {
            Some(item) => item.add_location(location_id),
            None => false,
        }
    }

    /// Appends an item.
    ///
    /// Ids are assigned by the caller via [`next_id`](Self::next_id); a
    /// duplicate id is a programming error.
    pub fn insert(&mut self, item: ContentItem) {
        debug_assert!(
            self.find(item.id).is_none(),
            "duplicate catalog id {}",
            item.id
        );
        self.items.push(item);
    }

    /// Returns the next free id (max existing id + 1).
    pub fn next_id(&self) -> u64 {
        self.items.iter().map(|item| item.id).max().unwrap_or(0) + 1
    }

    /// Removes up to `count` items in eviction order and returns their ids.
    ///
    /// Eviction order is popularity ascending, then `last_updated`
    /// ascending, then id ascending: the least popular and oldest entries
    /// leave first, with the id as a deterministic tie-break. Remaining
    /// items keep their insertion order.
    pub fn remove_oldest(&mut self, count: usize) -> Vec<u64> {
        if count == 0 || self.items.is_empty() {
            return Vec::new();
        }

        let mut order: Vec<(u8, DateTime<Utc>, u64)> = self
            .items
            .iter()
            .map(|item| (item.popularity, item.last_updated, item.id))
            .collect();
        order.sort();

        let doomed: HashSet<u64> = order.iter().take(count).map(|&(_, _, id)| id).collect();
        self.items.retain(|item| !doomed.contains(&item.id));

        let mut removed: Vec<u64> = doomed.into_iter().collect();
        removed.sort_unstable();
        removed
    }

    /// Restores the default four-item catalog.
    pub fn reset_to_defaults(&mut self, now: DateTime<Utc>) {
        self.items = default_content_items(now);
    }
}

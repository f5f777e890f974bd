//! Content catalog: item types, seed data, and the mutable store.
//!
//! The catalog is the simulation's source of truth for what content exists,
//! where it is cached, and how popular it is. The store is owned exclusively
//! by the engine; observers only ever see cloned snapshots.

mod item;
mod seed;
mod store;

pub use item::{bump_version, parse_size_mb, scale_size, ContentItem, ContentType};
pub use seed::default_content_items;
pub use store::CatalogStore;

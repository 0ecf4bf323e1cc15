//! Local caching module for offline data access.
//!
//! This module provides the `ResourceCache`, a bounded LRU of JSON
//! payloads keyed by resource id, and the `ResourceLoader` which wraps it
//! with the stale-while-revalidate policy every screen uses:
//!
//! - fresh cache hit: serve immediately, refresh in the background
//! - absent or stale: fetch, cache on success
//! - fetch failure: fall back to the stale copy when one exists
//!
//! Entries are trusted for 5 minutes by default and capacity is explicit,
//! so per-coach program caches no longer grow without bound.

pub mod loader;
pub mod store;

pub use loader::{Loaded, ResourceLoader, Source};
pub use store::{CachedResource, ResourceCache, DEFAULT_TTL_MS};

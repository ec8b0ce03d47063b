//! Cache Module
//!
//! Provides an in-memory read-through cache with per-entry TTL expiration.

use std::collections::HashMap;
use std::sync::Mutex;

mod entry;
pub(crate) mod lock;
mod ttl_cache;


// Re-export public types
pub(crate) use entry::CacheEntry;
pub use entry::{normalize_ttl, ttl_from_millis};
pub use ttl_cache::TtlCache;

/// Key -> entry map shared between the cache and its eviction tasks.
pub(crate) type EntryMap<V> = Mutex<HashMap<String, CacheEntry<V>>>;

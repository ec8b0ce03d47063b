//! TTL Cache Module
//!
//! Read-through key-value cache with per-entry expiry. Every expiring entry
//! owns a scheduled eviction; the passive check on access covers the window
//! before that eviction runs.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

use crate::cache::lock::mutex_lock;
use crate::cache::{normalize_ttl, CacheEntry, EntryMap};
use crate::tasks::spawn_eviction;

/// Per-key gate serializing read-through fills.
#[derive(Default)]
struct FillSlot {
    gate: Arc<AsyncMutex<()>>,
    waiters: usize,
}

type FillSlots = Mutex<HashMap<String, FillSlot>>;

struct Shared<V> {
    entries: Arc<EntryMap<V>>,
    fills: FillSlots,
    next_id: AtomicU64,
}

// == TTL Cache ==
/// In-memory cache mapping string keys to values of type `V`.
///
/// Cloning a `TtlCache` yields another handle to the same cache.
///
/// A TTL of `None` or zero stores the entry without expiry: it stays until
/// it is deleted, cleared or replaced. Producer failures are returned to
/// the caller unchanged and leave the cache as it was.
pub struct TtlCache<V> {
    shared: Arc<Shared<V>>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<V> Default for TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                entries: Arc::new(Mutex::new(HashMap::new())),
                fills: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry and
    /// cancelling its pending eviction. Returns the stored value.
    ///
    /// Active eviction needs a Tokio runtime. Outside of one the entry is
    /// still expired on access, just never removed in the background.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) -> V {
        let replaced = {
            let mut entries = mutex_lock(&self.shared.entries, "set");
            self.install(&mut entries, key.into(), value.clone(), ttl)
        };
        drop(replaced);
        value
    }

    /// Runs `producer` and stores its result under `key`.
    ///
    /// The producer is awaited before the map is touched; when it fails the
    /// error is returned as is and nothing is stored.
    pub async fn set_with<F, Fut, E>(
        &self,
        key: impl Into<String>,
        ttl: Option<Duration>,
        producer: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let key = key.into();
        let value = producer().await?;
        Ok(self.set(key, value, ttl))
    }

    // == Get ==
    /// Returns the value cached under `key`.
    ///
    /// An entry whose deadline has passed is removed and reported as absent,
    /// even if its scheduled eviction has not run yet.
    pub fn get(&self, key: &str) -> Option<V> {
        let stale = {
            let mut entries = mutex_lock(&self.shared.entries, "get");
            let entry = entries.get(key)?;
            if !entry.is_expired() {
                debug!(key, "Using cached value");
                return Some(entry.value.clone());
            }
            entries.remove(key)
        };
        drop(stale);
        None
    }

    /// Returns the cached value, or stores and returns `value` when the key
    /// is absent or expired.
    pub fn get_or_set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) -> V {
        let key = key.into();
        let replaced = {
            let mut entries = mutex_lock(&self.shared.entries, "get_or_set");
            if let Some(entry) = entries.get(&key).filter(|entry| !entry.is_expired()) {
                debug!(key = %key, "Using cached value");
                return entry.value.clone();
            }
            self.install(&mut entries, key, value.clone(), ttl)
        };
        drop(replaced);
        value
    }

    /// Read-through lookup: returns the cached value, or runs `producer`
    /// and caches its result when the key is absent or expired.
    ///
    /// Concurrent fills of the same key are serialized: while one producer
    /// runs, other callers for that key wait and then re-check the cache,
    /// so a successful producer runs once for all of them. A failed producer
    /// caches nothing and the next waiter runs its own.
    pub async fn get_or_set_with<F, Fut, E>(
        &self,
        key: impl Into<String>,
        ttl: Option<Duration>,
        producer: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let key = key.into();
        if let Some(value) = self.peek(&key) {
            return Ok(value);
        }

        let fill = FillGuard::enter(&self.shared.fills, &key);
        let _permit = fill.gate.lock().await;

        if let Some(value) = self.peek(&key) {
            return Ok(value);
        }
        self.set_with(key, ttl, producer).await
    }

    // == Delete ==
    /// Removes the entry for `key`, if any, cancelling its pending eviction.
    pub fn delete(&self, key: &str) {
        let removed = mutex_lock(&self.shared.entries, "delete").remove(key);
        drop(removed);
    }

    /// Removes every listed key. Absent keys are ignored.
    pub fn delete_many<I, K>(&self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let removed: Vec<CacheEntry<V>> = {
            let mut entries = mutex_lock(&self.shared.entries, "delete_many");
            keys.into_iter()
                .filter_map(|key| entries.remove(key.as_ref()))
                .collect()
        };
        drop(removed);
    }

    // == Clear ==
    /// Removes every entry and cancels every pending eviction.
    pub fn clear(&self) {
        let drained = std::mem::take(&mut *mutex_lock(&self.shared.entries, "clear"));
        drop(drained);
    }

    // == Length ==
    /// Number of entries currently held, including expired entries that
    /// have not been removed yet.
    pub fn len(&self) -> usize {
        mutex_lock(&self.shared.entries, "len").len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the keys currently held, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        mutex_lock(&self.shared.entries, "keys")
            .keys()
            .cloned()
            .collect()
    }

    /// Fresh value for `key`, without removing a stale entry.
    fn peek(&self, key: &str) -> Option<V> {
        let entries = mutex_lock(&self.shared.entries, "peek");
        let entry = entries.get(key).filter(|entry| !entry.is_expired())?;
        debug!(key, "Using cached value");
        Some(entry.value.clone())
    }

    /// Builds the entry, schedules its eviction and swaps it into the map.
    ///
    /// Runs under the map lock, so the eviction task cannot observe the map
    /// before the entry is in place. Returns the replaced entry so the caller
    /// can drop it, aborting its eviction, after releasing the lock.
    fn install(
        &self,
        entries: &mut HashMap<String, CacheEntry<V>>,
        key: String,
        value: V,
        ttl: Option<Duration>,
    ) -> Option<CacheEntry<V>> {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let mut entry = CacheEntry::new(value, id, normalize_ttl(ttl));

        if let Some(deadline) = entry.expires_at {
            match Handle::try_current() {
                Ok(runtime) => entry.arm(spawn_eviction(
                    &runtime,
                    Arc::downgrade(&self.shared.entries),
                    key.clone(),
                    id,
                    deadline,
                )),
                Err(_) => debug!(key = %key, "No runtime, entry expires on access only"),
            }
        }

        entries.insert(key, entry)
    }
}

/// Registration in the per-key fill table, released on drop.
struct FillGuard<'a> {
    slots: &'a FillSlots,
    key: String,
    gate: Arc<AsyncMutex<()>>,
}

impl<'a> FillGuard<'a> {
    fn enter(slots: &'a FillSlots, key: &str) -> Self {
        let mut guard = mutex_lock(slots, "fill_enter");
        let slot = guard.entry(key.to_string()).or_default();
        slot.waiters += 1;
        Self {
            slots,
            key: key.to_string(),
            gate: Arc::clone(&slot.gate),
        }
    }
}

impl Drop for FillGuard<'_> {
    fn drop(&mut self) {
        let mut slots = mutex_lock(self.slots, "fill_leave");
        if let Some(slot) = slots.get_mut(&self.key) {
            slot.waiters -= 1;
            if slot.waiters == 0 {
                slots.remove(&self.key);
            }
        }
    }
}

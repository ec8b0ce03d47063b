//! TTL Eviction Task
//!
//! One short-lived task per expiring cache entry. The task sleeps until
//! the entry's deadline and then removes it, unless the entry has been
//! replaced or deleted in the meantime.

use std::sync::Weak;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::lock::mutex_lock;
use crate::cache::EntryMap;

/// Spawns the eviction of the entry `id` stored under `key`.
///
/// The task holds only a weak reference to the map, so a dropped cache is
/// not kept alive by its pending evictions. When it wakes it removes the
/// entry only if the key still maps to the same generation `id`; a
/// replacement that reused the key is left untouched.
///
/// # Returns
/// The abort handle of the task. The caller stores it in the entry so the
/// eviction is cancelled when the entry goes away first.
pub(crate) fn spawn_eviction<V>(
    runtime: &Handle,
    entries: Weak<EntryMap<V>>,
    key: String,
    id: u64,
    deadline: Instant,
) -> AbortHandle
where
    V: Send + 'static,
{
    let task = runtime.spawn(async move {
        tokio::time::sleep_until(deadline).await;

        let Some(entries) = entries.upgrade() else {
            return;
        };

        let evicted = {
            let mut guard = mutex_lock(&entries, "evict");
            let still_ours = guard.get(&key).is_some_and(|entry| entry.id == id);
            if still_ours {
                guard.remove(&key)
            } else {
                None
            }
        };

        if let Some(mut entry) = evicted {
            // The entry is being removed by its own eviction task.
            entry.disarm();
            debug!(key = %key, "Evicted expired cache entry");
        }
    });

    task.abort_handle()
}

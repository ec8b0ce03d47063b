use std::sync::{Mutex, MutexGuard};

use tracing::warn;

/// Locks a cache mutex, recovering the guard if another thread panicked
/// while holding it. Every critical section in the cache leaves the map
/// consistent, so the data behind a poisoned lock is still usable.
pub(crate) fn mutex_lock<'a, T>(lock: &'a Mutex<T>, op: &'static str) -> MutexGuard<'a, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(
                op,
                lock_kind = "mutex.lock",
                result = "poisoned_recovered",
                "Recovered from poisoned cache lock"
            );
            poisoned.into_inner()
        }
    }
}

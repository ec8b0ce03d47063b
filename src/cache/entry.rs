//! Cache Entry Module
//!
//! Defines a single cached value together with its deadline and the
//! handle of its scheduled eviction.

use std::time::Duration;

use tokio::task::AbortHandle;
use tokio::time::Instant;

// == Cache Entry ==
/// One cached value and its expiry metadata.
///
/// An entry with a deadline owns the abort handle of the task that will
/// evict it. Dropping the entry (replacement, delete, clear) aborts that
/// task, so no eviction outlives the entry it was scheduled for.
#[derive(Debug)]
pub(crate) struct CacheEntry<V> {
    /// The stored value
    pub(crate) value: V,
    /// Generation number, unique per cache
    pub(crate) id: u64,
    /// Deadline after which the entry is stale, None = no expiration
    pub(crate) expires_at: Option<Instant>,
    eviction: Option<AbortHandle>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry that expires `ttl` from now, or never when `ttl` is None.
    ///
    /// A TTL whose deadline cannot be represented as an `Instant` (such as
    /// `Duration::MAX`) is stored without expiry.
    pub(crate) fn new(value: V, id: u64, ttl: Option<Duration>) -> Self {
        Self {
            value,
            id,
            expires_at: ttl.and_then(|ttl| Instant::now().checked_add(ttl)),
            eviction: None,
        }
    }

    /// Attaches the handle of the task scheduled to evict this entry.
    pub(crate) fn arm(&mut self, handle: AbortHandle) {
        self.eviction = Some(handle);
    }

    /// Detaches the eviction handle without aborting it. Used by the
    /// eviction task itself when it removes its own entry.
    pub(crate) fn disarm(&mut self) {
        self.eviction = None;
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its deadline.
    /// Entries without a deadline never expire.
    pub(crate) fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub(crate) fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }
}

impl<V> Drop for CacheEntry<V> {
    fn drop(&mut self) {
        if let Some(handle) = self.eviction.take() {
            handle.abort();
        }
    }
}

// == TTL Helpers ==
/// Normalizes a TTL: zero means "no expiry".
pub fn normalize_ttl(ttl: Option<Duration>) -> Option<Duration> {
    ttl.filter(|ttl| !ttl.is_zero())
}

/// Converts a signed millisecond TTL into a cache TTL.
///
/// Zero and negative values are clamped to "no expiry".
pub fn ttl_from_millis(ms: i64) -> Option<Duration> {
    u64::try_from(ms)
        .ok()
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_from_millis() {
        assert_eq!(ttl_from_millis(1500), Some(Duration::from_millis(1500)));
        assert_eq!(ttl_from_millis(0), None);
        assert_eq!(ttl_from_millis(-20), None);
    }

    #[test]
    fn test_normalize_ttl() {
        assert_eq!(normalize_ttl(None), None);
        assert_eq!(normalize_ttl(Some(Duration::ZERO)), None);
        assert_eq!(
            normalize_ttl(Some(Duration::from_secs(1))),
            Some(Duration::from_secs(1))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_without_ttl_never_expires() {
        let entry = CacheEntry::new("value", 1, None);
        assert!(entry.expires_at.is_none());

        tokio::time::advance(Duration::from_secs(3600)).await;
        assert!(!entry.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrepresentable_deadline_never_expires() {
        let entry = CacheEntry::new("value", 1, Some(Duration::MAX));
        assert!(entry.expires_at.is_none());

        tokio::time::advance(Duration::from_secs(86_400 * 365)).await;
        assert!(!entry.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expiration() {
        let entry = CacheEntry::new("value", 1, Some(Duration::from_millis(100)));
        assert!(!entry.is_expired());

        tokio::time::advance(Duration::from_millis(99)).await;
        assert!(!entry.is_expired());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(entry.is_expired(), "Entry should be expired at its deadline");
    }

    #[tokio::test]
    async fn test_drop_aborts_eviction() {
        let task = tokio::spawn(std::future::pending::<()>());
        let mut entry = CacheEntry::new("value", 1, Some(Duration::from_secs(60)));
        entry.arm(task.abort_handle());

        drop(entry);

        let result = task.await;
        assert!(result.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn test_disarm_keeps_task_running() {
        let task = tokio::spawn(async { 7 });
        let mut entry = CacheEntry::new("value", 1, Some(Duration::from_secs(60)));
        entry.arm(task.abort_handle());
        entry.disarm();

        drop(entry);

        assert_eq!(task.await.unwrap(), 7);
    }
}

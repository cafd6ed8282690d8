//! In-memory response cache whose entries expire at the next UTC midnight,
//! which is when the upstream rates are refreshed.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

/// How often the background sweeper drops expired entries.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// A decoded API response body.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Cache of decoded API responses keyed by their canonical request URL.
pub type ResponseCache = Cache<String, Payload>;

/// Returns the first UTC midnight strictly after `now`.
pub fn next_utc_midnight(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .succ_opt()
        .and_then(|tomorrow| tomorrow.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

struct CacheValue<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

impl<V> CacheValue<V> {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Thread-safe key-value cache with a per-entry expiry instant.
///
/// Keys are never logged, they may carry credentials.
pub struct Cache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Mutex<HashMap<K, CacheValue<V>>>,
    sweeper_started: AtomicBool,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            sweeper_started: AtomicBool::new(false),
        }
    }

    /// Returns the value for `key` unless it is missing or expired.
    pub async fn get(&self, key: &K) -> Option<V> {
        let cache = self.inner.lock().await;
        match cache.get(key) {
            Some(entry) if entry.is_expired(Utc::now()) => {
                debug!("Cache entry expired");
                None
            }
            Some(entry) => {
                debug!("Cache HIT");
                Some(entry.value.clone())
            }
            None => {
                debug!("Cache MISS");
                None
            }
        }
    }

    /// Stores `value` until the next UTC midnight after now.
    pub async fn put(&self, key: K, value: V) {
        let expires_at = next_utc_midnight(Utc::now());
        self.put_until(key, value, expires_at).await;
    }

    /// Stores `value` until `expires_at`.
    pub async fn put_until(&self, key: K, value: V, expires_at: DateTime<Utc>) {
        let mut cache = self.inner.lock().await;
        debug!(%expires_at, "Cache PUT");
        cache.insert(key, CacheValue { value, expires_at });
    }

    pub async fn remove(&self, key: &K) {
        let mut cache = self.inner.lock().await;
        cache.remove(key);
        debug!("Cache REMOVE");
    }

    pub async fn clear(&self) {
        let mut cache = self.inner.lock().await;
        cache.clear();
        debug!("Cache CLEAR");
    }

    /// Number of stored entries, expired ones included until they are swept.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    /// Drops every expired entry and returns how many were removed.
    pub async fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let mut cache = self.inner.lock().await;
        let before = cache.len();
        cache.retain(|_, entry| !entry.is_expired(now));
        let removed = before - cache.len();
        if removed > 0 {
            debug!(removed, "Cache SWEEP");
        }
        removed
    }

    /// Runs [`Cache::sweep_expired`] every `period` on the current tokio runtime.
    ///
    /// The task only holds a weak reference and stops once the cache is dropped.
    /// At most one sweeper runs per cache, later calls return `None`.
    pub fn spawn_sweeper(self: &Arc<Self>, period: Duration) -> Option<JoinHandle<()>> {
        if self.sweeper_started.swap(true, Ordering::SeqCst) {
            return None;
        }
        let cache: Weak<Self> = Arc::downgrade(self);
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // the first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    debug!("Cache dropped, stopping sweeper");
                    break;
                };
                cache.sweep_expired().await;
            }
        }))
    }
}

impl<K, V> Default for Cache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone};

    #[test]
    fn test_next_utc_midnight() {
        let late = Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 0).unwrap();
        let early = Utc.with_ymd_and_hms(2024, 3, 11, 0, 1, 0).unwrap();
        let exact = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();

        assert_eq!(
            next_utc_midnight(late),
            Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap()
        );
        assert_eq!(
            next_utc_midnight(early),
            Utc.with_ymd_and_hms(2024, 3, 12, 0, 0, 0).unwrap()
        );
        assert_eq!(
            next_utc_midnight(exact),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_cache_get_put() {
        let cache = Cache::<String, i32>::new();

        // Initially, cache is empty
        assert!(cache.get(&"key1".to_string()).await.is_none());

        cache.put("key1".to_string(), 123).await;
        assert_eq!(cache.get(&"key1".to_string()).await, Some(123));
        assert!(cache.get(&"key2".to_string()).await.is_none());
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_absent_until_swept() {
        let cache = Cache::<String, i32>::new();
        let past = Utc::now() - ChronoDuration::seconds(1);
        let future = Utc::now() + ChronoDuration::hours(1);

        cache.put_until("stale".to_string(), 1, past).await;
        cache.put_until("fresh".to_string(), 2, future).await;

        assert!(cache.get(&"stale".to_string()).await.is_none());
        assert_eq!(cache.get(&"fresh".to_string()).await, Some(2));
        assert_eq!(cache.len().await, 2);

        assert_eq!(cache.sweep_expired().await, 1);
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get(&"fresh".to_string()).await, Some(2));
    }

    #[tokio::test]
    async fn test_cache_remove_and_clear() {
        let cache = Cache::<String, i32>::new();
        cache.put("key1".to_string(), 123).await;
        cache.put("key2".to_string(), 456).await;

        cache.remove(&"key1".to_string()).await;
        assert!(cache.get(&"key1".to_string()).await.is_none());
        assert_eq!(cache.get(&"key2".to_string()).await, Some(456));

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_removes_expired_entries() {
        let cache = Arc::new(Cache::<String, i32>::new());
        let past = Utc::now() - ChronoDuration::seconds(1);
        cache.put_until("stale".to_string(), 1, past).await;

        let handle = cache.spawn_sweeper(SWEEP_INTERVAL).unwrap();
        assert!(cache.spawn_sweeper(SWEEP_INTERVAL).is_none());
        tokio::time::sleep(SWEEP_INTERVAL + Duration::from_secs(1)).await;
        assert!(cache.is_empty().await);

        drop(cache);
        tokio::time::sleep(SWEEP_INTERVAL * 2).await;
        assert!(handle.is_finished());
    }
}

//! Stale-while-revalidate orchestration over the resource cache.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::store::ResourceCache;

/// Where a loaded value came from, so screens can annotate cached or
/// fallback data instead of presenting it as live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Fetched from the network on this call
    Network,
    /// Served from a fresh cache entry; a background refresh was started
    Cache,
    /// The fetch failed and a stale cached copy was served instead
    StaleFallback,
}

#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub data: T,
    pub source: Source,
}

impl<T> Loaded<T> {
    /// True when the value should carry a "cached" indicator in the UI
    pub fn is_cached(&self) -> bool {
        !matches!(self.source, Source::Network)
    }
}

/// Loads resources through the cache with the policy every screen shares:
/// fresh hits are served immediately and refreshed in the background,
/// misses fetch in the foreground, and fetch failures fall back to the
/// stale copy when one exists.
#[derive(Clone)]
pub struct ResourceLoader {
    cache: Arc<Mutex<ResourceCache>>,
}

impl ResourceLoader {
    pub fn new(cache: ResourceCache) -> Self {
        Self {
            cache: Arc::new(Mutex::new(cache)),
        }
    }

    /// Shared handle to the underlying cache
    pub fn cache(&self) -> Arc<Mutex<ResourceCache>> {
        Arc::clone(&self.cache)
    }

    /// Load the resource under `key`, calling `fetch` as needed.
    ///
    /// `fetch` may be called zero times (fresh hit pending background
    /// refresh), once in the foreground, or once on a background task;
    /// background results overwrite the cache last-write-wins.
    pub async fn load<T, F, Fut>(&self, key: &str, fetch: F) -> Result<Loaded<T>>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send,
    {
        let now = Utc::now();
        let (cached_payload, fresh) = {
            let mut cache = self.cache.lock().await;
            let ttl_ms = cache.ttl_ms();
            match cache.get(key) {
                Some(entry) => (Some(entry.payload.clone()), entry.is_fresh(now, ttl_ms)),
                None => (None, false),
            }
        };

        if fresh {
            if let Some(payload) = &cached_payload {
                if let Ok(data) = serde_json::from_value::<T>(payload.clone()) {
                    self.spawn_refresh(key.to_string(), fetch);
                    return Ok(Loaded {
                        data,
                        source: Source::Cache,
                    });
                }
                // Payload no longer decodes as T; treat as a miss
                debug!(key = key, "Cached payload undecodable, refetching");
            }
        }

        match fetch().await {
            Ok(data) => {
                let payload = serde_json::to_value(&data)?;
                self.cache.lock().await.put(key, payload);
                Ok(Loaded {
                    data,
                    source: Source::Network,
                })
            }
            Err(err) => {
                if let Some(payload) = cached_payload {
                    if let Ok(data) = serde_json::from_value::<T>(payload) {
                        warn!(key = key, error = %err, "Fetch failed, serving stale cache entry");
                        return Ok(Loaded {
                            data,
                            source: Source::StaleFallback,
                        });
                    }
                }
                Err(err)
            }
        }
    }

    /// Refresh the entry off the caller's path. Failures are logged and
    /// swallowed so they never disturb the response already served.
    fn spawn_refresh<T, F, Fut>(&self, key: String, fetch: F)
    where
        T: Serialize + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send,
    {
        let cache = Arc::clone(&self.cache);
        tokio::spawn(async move {
            match fetch().await {
                Ok(data) => match serde_json::to_value(&data) {
                    Ok(payload) => {
                        cache.lock().await.put(&key, payload);
                        debug!(key = %key, "Background refresh updated cache");
                    }
                    Err(e) => debug!(key = %key, error = %e, "Background refresh unserializable"),
                },
                Err(e) => debug!(key = %key, error = %e, "Background refresh failed"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::DEFAULT_TTL_MS;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    type BoxedFetch = std::pin::Pin<Box<dyn Future<Output = Result<Vec<i64>>> + Send>>;

    fn counted_fetch(
        calls: &Arc<AtomicUsize>,
        value: Vec<i64>,
    ) -> impl Fn() -> BoxedFetch + Send + Sync + 'static {
        let calls = Arc::clone(calls);
        move || -> BoxedFetch {
            let calls = Arc::clone(&calls);
            let value = value.clone();
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(value)
            })
        }
    }

    fn failing_fetch(message: &'static str) -> impl Fn() -> BoxedFetch + Send + Sync + 'static {
        move || -> BoxedFetch { Box::pin(async move { Err(anyhow::anyhow!(message)) }) }
    }

    #[tokio::test]
    async fn test_miss_fetches_from_network() {
        let loader = ResourceLoader::new(ResourceCache::new(8, DEFAULT_TTL_MS));
        let calls = Arc::new(AtomicUsize::new(0));

        let loaded = loader
            .load("gyms", counted_fetch(&calls, vec![1, 2, 3]))
            .await
            .unwrap();

        assert_eq!(loaded.data, vec![1, 2, 3]);
        assert_eq!(loaded.source, Source::Network);
        assert!(!loaded.is_cached());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fresh_hit_serves_cache_and_refreshes() {
        let loader = ResourceLoader::new(ResourceCache::new(8, DEFAULT_TTL_MS));
        let calls = Arc::new(AtomicUsize::new(0));

        loader
            .load("gyms", counted_fetch(&calls, vec![1]))
            .await
            .unwrap();

        let loaded = loader
            .load("gyms", counted_fetch(&calls, vec![2]))
            .await
            .unwrap();
        assert_eq!(loaded.source, Source::Cache);
        assert_eq!(loaded.data, vec![1]);

        // The background refresh lands shortly after
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let cache = loader.cache();
        let payload = cache.lock().await.get("gyms").unwrap().payload.clone();
        assert_eq!(payload, serde_json::json!([2]));
    }

    #[tokio::test]
    async fn test_stale_entry_refetches_in_foreground() {
        // ttl 0: nothing is ever fresh
        let loader = ResourceLoader::new(ResourceCache::new(8, 0));
        let calls = Arc::new(AtomicUsize::new(0));

        loader.load("gyms", counted_fetch(&calls, vec![1])).await.unwrap();
        let loaded = loader
            .load("gyms", counted_fetch(&calls, vec![2]))
            .await
            .unwrap();

        assert_eq!(loaded.source, Source::Network);
        assert_eq!(loaded.data, vec![2]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_serves_stale_fallback() {
        let loader = ResourceLoader::new(ResourceCache::new(8, 0));
        let calls = Arc::new(AtomicUsize::new(0));

        loader.load("gyms", counted_fetch(&calls, vec![1])).await.unwrap();

        let loaded = loader
            .load("gyms", failing_fetch("connection refused"))
            .await
            .unwrap();

        assert_eq!(loaded.source, Source::StaleFallback);
        assert!(loaded.is_cached());
        assert_eq!(loaded.data, vec![1]);
    }

    #[tokio::test]
    async fn test_fetch_failure_with_empty_cache_errors() {
        let loader = ResourceLoader::new(ResourceCache::new(8, DEFAULT_TTL_MS));

        let result = loader.load("gyms", failing_fetch("HTTP 500")).await;

        // No cached copy to fall back on: the caller renders the error
        // state with its retry action
        assert!(result.is_err());
    }
}

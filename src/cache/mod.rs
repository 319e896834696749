//! Bounded in-memory cache with an explicit, cancellable sweep task.
//!
//! Entries record when they were cached and how often they were read. A
//! periodic sweep removes entries that are both older than the maximum age
//! and never read; reads of an entry past the maximum age miss so that the
//! caller refreshes it.

use crate::config::CacheSettings;
use crate::upstream::{Fetch, FetchError, HttpResponse};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

struct CachedEntry<V> {
    value: V,
    cached_at: Instant,
    access_count: u64,
}

/// Snapshot of cache usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub total_accesses: u64,
    /// Key with the highest access count, with that count.
    pub most_accessed: Option<(String, u64)>,
}

/// Bounded map from string keys to values. When full, inserting a new key
/// evicts the oldest entry.
pub struct ResourceCache<V> {
    entries: Mutex<IndexMap<String, CachedEntry<V>>>,
    max_entries: usize,
    max_age: Duration,
}

impl<V: Clone + Send> ResourceCache<V> {
    pub fn new(max_entries: usize, max_age: Duration) -> Self {
        Self {
            entries: Mutex::new(IndexMap::new()),
            max_entries: max_entries.max(1),
            max_age,
        }
    }

    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(settings.max_entries, Duration::from_secs(settings.max_age_secs))
    }

    /// Read `key`, counting the access. Entries past the maximum age are
    /// dropped and reported as a miss.
    pub async fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().await;
        let entry = entries.get_mut(key)?;

        if entry.cached_at.elapsed() > self.max_age {
            info!("Cache entry expired: {}", key);
            entries.shift_remove(key);
            return None;
        }

        entry.access_count += 1;
        debug!("Cache hit: {} (access count: {})", key, entry.access_count);
        Some(entry.value.clone())
    }

    /// Insert or replace `key`. A replaced entry starts over as the newest,
    /// with no recorded accesses.
    pub async fn insert(&self, key: &str, value: V) {
        let mut entries = self.entries.lock().await;
        entries.shift_remove(key);
        while entries.len() >= self.max_entries {
            if let Some((evicted, _)) = entries.shift_remove_index(0) {
                debug!("Cache full, evicted: {}", evicted);
            }
        }
        entries.insert(
            key.to_string(),
            CachedEntry {
                value,
                cached_at: Instant::now(),
                access_count: 0,
            },
        );
    }

    pub async fn remove(&self, key: &str) -> bool {
        self.entries.lock().await.shift_remove(key).is_some()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Remove entries older than the maximum age that were never read.
    pub async fn sweep(&self) -> usize {
        self.sweep_at(Instant::now()).await
    }

    /// [`sweep`](Self::sweep) as if the current time were `now`.
    pub async fn sweep_at(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|key, entry| {
            let stale = now.saturating_duration_since(entry.cached_at) > self.max_age && entry.access_count == 0;
            if stale {
                info!("Removing stale cache entry: {}", key);
            }
            !stale
        });
        before - entries.len()
    }

    pub async fn stats(&self) -> CacheStats {
        let entries = self.entries.lock().await;
        CacheStats {
            entries: entries.len(),
            total_accesses: entries.values().map(|e| e.access_count).sum(),
            most_accessed: entries
                .iter()
                .max_by_key(|(_, e)| e.access_count)
                .map(|(k, e)| (k.clone(), e.access_count)),
        }
    }
}

/// Sweep `cache` every `interval` until `cancel` fires.
pub fn spawn_sweeper<V>(
    cache: Arc<ResourceCache<V>>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!("Cache sweeper started (every {:?})", interval);
        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    let removed = cache.sweep().await;
                    let stats = cache.stats().await;
                    debug!(
                        "Cache sweep removed {} entries; {} remain, {} total accesses",
                        removed, stats.entries, stats.total_accesses
                    );
                }
                _ = cancel.cancelled() => {
                    info!("Cache sweeper shutting down");
                    return;
                }
            }
        }
    })
}

/// [`Fetch`] decorator that caches successful GET responses by URL.
pub struct CachingFetcher {
    inner: Arc<dyn Fetch>,
    cache: Arc<ResourceCache<HttpResponse>>,
}

impl CachingFetcher {
    pub fn new(inner: Arc<dyn Fetch>, cache: Arc<ResourceCache<HttpResponse>>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl Fetch for CachingFetcher {
    async fn get(&self, url: &Url, headers: &[(String, String)]) -> Result<HttpResponse, FetchError> {
        if let Some(hit) = self.cache.get(url.as_str()).await {
            return Ok(hit);
        }

        let resp = self.inner.get(url, headers).await?;
        if resp.is_success() {
            self.cache.insert(url.as_str(), resp.clone()).await;
        }
        Ok(resp)
    }
}

//! In-memory tagged cache with LRU eviction.
//!
//! Every tag owns a set of the keys stored under it, so invalidating a tag
//! touches only those keys. A key leaves its tag sets when it is found
//! expired or pushed out by the LRU policy, so the index never tracks more
//! keys than the store holds.

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use bookshelf_core::cache::{CacheTag, Result, TaggedCache};

/// A single cache entry with optional expiration.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        Self { value, expires_at }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() > exp)
    }
}

#[derive(Debug)]
struct Inner {
    store: LruCache<String, CacheEntry>,
    /// Maps tag -> keys stored under it.
    tracking: HashMap<CacheTag, HashSet<String>>,
}

impl Inner {
    fn untrack(&mut self, key: &str) {
        self.tracking.retain(|_, keys| {
            keys.remove(key);
            !keys.is_empty()
        });
    }
}

/// In-memory cache implementation with LRU eviction.
///
/// The store and the tag index share one lock so an invalidation never
/// interleaves with a half-finished `set`. Expired entries are dropped lazily
/// on read.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryCache {
    /// Creates a cache holding at most `max_entries` values (minimum 1).
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(RwLock::new(Inner {
                store: LruCache::new(capacity),
                tracking: HashMap::new(),
            })),
        }
    }
}

#[async_trait]
impl TaggedCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut inner = self.inner.write().await;

        let expired = match inner.store.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };

        if expired {
            inner.store.pop(key);
            inner.untrack(key);
        }

        Ok(None)
    }

    async fn set(
        &self,
        key: &str,
        value: &[u8],
        tags: &[CacheTag],
        ttl: Option<Duration>,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;

        let evicted = inner
            .store
            .push(key.to_string(), CacheEntry::new(value.to_vec(), ttl));
        if let Some((evicted_key, _)) = evicted {
            if evicted_key != key {
                inner.untrack(&evicted_key);
            }
        }

        for tag in tags {
            inner
                .tracking
                .entry(*tag)
                .or_default()
                .insert(key.to_string());
        }

        Ok(())
    }

    async fn invalidate_tags(&self, tags: &[CacheTag]) -> Result<()> {
        let mut inner = self.inner.write().await;

        for tag in tags {
            let Some(keys) = inner.tracking.remove(tag) else {
                continue;
            };
            for key in &keys {
                inner.store.pop(key);
            }
            tracing::debug!(tag = %tag, evicted = keys.len(), "Invalidated cache tag");
        }

        Ok(())
    }
}

//! Cache-aside read path shared by the listing endpoints.

use std::future::Future;
use std::time::Duration;

use super::{format_tags, CacheTag, TaggedCache};

/// Returns the cached bytes for `key`, or runs `producer` and caches its output
/// under `tags`.
///
/// Cache failures never fail the call: a failed read is treated as a miss and
/// a failed write only logs a warning. Producer errors are returned unchanged
/// and nothing is cached for them.
pub async fn get_or_compute<C, F, Fut, E>(
    cache: &C,
    key: &str,
    tags: &[CacheTag],
    ttl: Option<Duration>,
    producer: F,
) -> Result<Vec<u8>, E>
where
    C: TaggedCache + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<u8>, E>>,
{
    match cache.get(key).await {
        Ok(Some(bytes)) => {
            tracing::trace!(key, "Cache hit");
            return Ok(bytes);
        }
        Ok(None) => tracing::trace!(key, "Cache miss"),
        Err(err) => tracing::warn!(key, error = %err, "Cache read failed, computing value"),
    }

    let bytes = producer().await?;

    if let Err(err) = cache.set(key, &bytes, tags, ttl).await {
        tracing::warn!(key, tags = %format_tags(tags), error = %err, "Failed to populate cache");
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::RwLock;

    use crate::cache::{CacheError, Result as CacheResult};

    #[derive(Default)]
    struct MockCache {
        store: RwLock<HashMap<String, Vec<u8>>>,
        fail_reads: bool,
    }

    #[async_trait]
    impl TaggedCache for MockCache {
        async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
            if self.fail_reads {
                return Err(CacheError::ConnectionFailed("down".to_string()));
            }
            Ok(self.store.read().await.get(key).cloned())
        }

        async fn set(
            &self,
            key: &str,
            value: &[u8],
            _tags: &[CacheTag],
            _ttl: Option<Duration>,
        ) -> CacheResult<()> {
            self.store
                .write()
                .await
                .insert(key.to_string(), value.to_vec());
            Ok(())
        }

        async fn invalidate_tags(&self, _tags: &[CacheTag]) -> CacheResult<()> {
            self.store.write().await.clear();
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_miss_runs_producer_and_populates() {
        let cache = MockCache::default();
        let calls = AtomicUsize::new(0);

        let bytes = get_or_compute(&cache, "k", &[CacheTag::Authors], None, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>(b"fresh".to_vec())
        })
        .await
        .unwrap();

        assert_eq!(bytes, b"fresh".to_vec());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            cache.store.read().await.get("k").cloned(),
            Some(b"fresh".to_vec())
        );
    }

    #[tokio::test]
    async fn test_hit_skips_producer() {
        let cache = MockCache::default();
        cache
            .set("k", b"cached", &[CacheTag::Books], None)
            .await
            .unwrap();

        let bytes = get_or_compute(&cache, "k", &[CacheTag::Books], None, || async {
            Err::<Vec<u8>, _>("producer must not run")
        })
        .await
        .unwrap();

        assert_eq!(bytes, b"cached".to_vec());
    }

    #[tokio::test]
    async fn test_producer_error_is_not_cached() {
        let cache = MockCache::default();

        let result = get_or_compute(&cache, "k", &[CacheTag::Books], None, || async {
            Err::<Vec<u8>, _>("boom")
        })
        .await;

        assert_eq!(result, Err("boom"));
        assert!(cache.store.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_read_falls_back_to_producer() {
        let cache = MockCache {
            fail_reads: true,
            ..MockCache::default()
        };

        let bytes = get_or_compute(&cache, "k", &[CacheTag::Authors], None, || async {
            Ok::<_, String>(b"computed".to_vec())
        })
        .await
        .unwrap();

        assert_eq!(bytes, b"computed".to_vec());
    }
}

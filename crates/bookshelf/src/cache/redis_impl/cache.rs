//! Redis tagged cache.
//!
//! Each tag is tracked in a Redis Set (`tag:{name}:_keys`) holding the keys
//! stored under it, so invalidation needs no SCAN.
//!
//! A tracking set is given the TTL of the newest entry stored under the tag,
//! so once every tracked entry has expired the set expires too.
//!
//! The commands are not atomic. A crash between SET and SADD leaves an
//! untracked key that expires through its TTL. A crash during invalidation
//! leaves a tracking set that the next invalidation finishes. Deleting a
//! missing key or set member is a no-op.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use bookshelf_core::cache::{tag_tracking_key, CacheTag, Result, TaggedCache};

use super::error::map_redis_error;

/// Redis cache backend using connection manager for pooling.
pub struct RedisCache {
    conn: redis::aio::ConnectionManager,
}

impl RedisCache {
    /// Connects to Redis at `url` (e.g. "redis://localhost:6379").
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if the connection cannot be established.
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl TaggedCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let result: Option<Vec<u8>> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(result)
    }

    async fn set(
        &self,
        key: &str,
        value: &[u8],
        tags: &[CacheTag],
        ttl: Option<Duration>,
    ) -> Result<()> {
        let mut conn = self.conn.clone();

        match ttl {
            Some(duration) => {
                let seconds = duration.as_secs().max(1);
                conn.set_ex::<_, _, ()>(key, value, seconds)
                    .await
                    .map_err(map_redis_error)?;
            }
            None => {
                conn.set::<_, _, ()>(key, value)
                    .await
                    .map_err(map_redis_error)?;
            }
        }

        for tag in tags {
            let tracking_key = tag_tracking_key(*tag);
            conn.sadd::<_, _, ()>(&tracking_key, key)
                .await
                .map_err(map_redis_error)?;

            // The set outlives its newest member; without a TTL it must persist.
            match ttl {
                Some(duration) => {
                    let seconds = i64::try_from(duration.as_secs().max(1)).unwrap_or(i64::MAX);
                    conn.expire::<_, ()>(&tracking_key, seconds)
                        .await
                        .map_err(map_redis_error)?;
                }
                None => {
                    conn.persist::<_, ()>(&tracking_key)
                        .await
                        .map_err(map_redis_error)?;
                }
            }
        }

        Ok(())
    }

    async fn invalidate_tags(&self, tags: &[CacheTag]) -> Result<()> {
        let mut conn = self.conn.clone();

        for tag in tags {
            let tracking_key = tag_tracking_key(*tag);

            let tracked_keys: Vec<String> = conn
                .smembers(&tracking_key)
                .await
                .map_err(map_redis_error)?;

            if !tracked_keys.is_empty() {
                conn.del::<_, ()>(&tracked_keys)
                    .await
                    .map_err(map_redis_error)?;
            }

            conn.del::<_, ()>(&tracking_key)
                .await
                .map_err(map_redis_error)?;

            tracing::debug!(tag = %tag, evicted = tracked_keys.len(), "Invalidated cache tag");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    /// Skip test if Redis not available.
    async fn get_test_cache() -> Option<RedisCache> {
        RedisCache::new(&redis_url()).await.ok()
    }

    fn test_key(suffix: &str) -> String {
        format!("test:redis_cache:{}:{}", rand::random::<u64>(), suffix)
    }

    /// Drops a test key and its tag memberships.
    async fn remove(cache: &RedisCache, key: &str) {
        let mut conn = cache.conn.clone();
        for tag in [CacheTag::Authors, CacheTag::Books] {
            conn.srem::<_, _, ()>(tag_tracking_key(tag), key)
                .await
                .unwrap();
        }
        conn.del::<_, ()>(key).await.unwrap();
    }

    #[tokio::test]
    async fn test_redis_set_and_get() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = test_key("set_get");
        cache.set(&key, b"hello", &[], None).await.unwrap();

        assert_eq!(cache.get(&key).await.unwrap(), Some(b"hello".to_vec()));

        remove(&cache, &key).await;
    }

    #[tokio::test]
    async fn test_redis_ttl() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = test_key("ttl");
        cache
            .set(&key, b"expiring", &[], Some(Duration::from_secs(1)))
            .await
            .unwrap();
        assert!(cache.get(&key).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(cache.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_redis_tracking_set_outlives_entries() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = test_key("tracked_ttl");
        cache
            .set(&key, b"x", &[CacheTag::Books], Some(Duration::from_secs(30)))
            .await
            .unwrap();

        let mut conn = cache.conn.clone();
        let entry_ttl: i64 = conn.ttl(&key).await.unwrap();
        let set_ttl: i64 = conn.ttl(tag_tracking_key(CacheTag::Books)).await.unwrap();

        assert!(entry_ttl > 0);
        assert!(set_ttl >= entry_ttl);

        remove(&cache, &key).await;
    }

    #[tokio::test]
    async fn test_redis_invalidate_tags() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let authors = test_key("authors");
        let books = test_key("books");

        cache
            .set(&authors, b"a", &[CacheTag::Authors], Some(Duration::from_secs(60)))
            .await
            .unwrap();
        cache
            .set(&books, b"b", &[CacheTag::Books], Some(Duration::from_secs(60)))
            .await
            .unwrap();

        cache.invalidate_tags(&[CacheTag::Authors]).await.unwrap();

        assert!(cache.get(&authors).await.unwrap().is_none());
        assert!(cache.get(&books).await.unwrap().is_some());

        let mut conn = cache.conn.clone();
        let tracked: Vec<String> = conn
            .smembers(tag_tracking_key(CacheTag::Authors))
            .await
            .unwrap();
        assert!(!tracked.contains(&authors));

        remove(&cache, &books).await;
    }

    #[tokio::test]
    async fn test_redis_binary_data() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = test_key("binary");
        let value: Vec<u8> = (0..=255).collect();

        cache.set(&key, &value, &[], None).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(value));

        remove(&cache, &key).await;
    }
}

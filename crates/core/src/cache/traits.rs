use std::time::Duration;

use async_trait::async_trait;

use super::{CacheTag, Result};

/// Key-value cache whose entries can be evicted by tag.
#[async_trait]
pub trait TaggedCache: Send + Sync {
    /// Gets a value from the cache by key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value labelled with `tags`, with an optional TTL.
    async fn set(
        &self,
        key: &str,
        value: &[u8],
        tags: &[CacheTag],
        ttl: Option<Duration>,
    ) -> Result<()>;

    /// Deletes every value labelled with any of `tags`.
    async fn invalidate_tags(&self, tags: &[CacheTag]) -> Result<()>;
}

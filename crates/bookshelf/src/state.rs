//! Application state shared by every request handler.
//!
//! The state holds the author and book services, which wrap repository and
//! cache trait objects, plus the authenticator used by admin-only routes.
//! The concrete backends are chosen by the storage and cache feature flags.

use std::sync::Arc;

use axum::extract::FromRef;

use bookshelf_core::auth::Authenticator;
use bookshelf_core::cache::TaggedCache;
use bookshelf_core::storage::{AuthorRepository, BookRepository};

use crate::config::Config;
use crate::services::{AuthorService, BookService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Author operations (cache-aside listing, tag invalidation on writes).
    pub authors: AuthorService,
    /// Book operations, including author resolution.
    pub books: BookService,
    /// Resolves bearer tokens for admin-only endpoints.
    pub authenticator: Arc<dyn Authenticator>,
}

impl FromRef<AppState> for Arc<dyn Authenticator> {
    fn from_ref(state: &AppState) -> Self {
        state.authenticator.clone()
    }
}

impl AppState {
    /// Wires both services over one repository and one cache.
    fn build<R>(
        repo: Arc<R>,
        cache: Arc<dyn TaggedCache>,
        authenticator: Arc<dyn Authenticator>,
        config: &Config,
    ) -> Self
    where
        R: AuthorRepository + BookRepository + 'static,
    {
        let ttl = config.cache_ttl();

        Self {
            authors: AuthorService::new(repo.clone(), repo.clone(), cache.clone(), ttl),
            books: BookService::new(repo.clone(), repo, cache, ttl),
            authenticator,
        }
    }
}

// ============================================================================
// Factory functions for different backend combinations
// ============================================================================

#[cfg(all(feature = "inmemory", feature = "memory"))]
mod inmemory_memory {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage and in-memory cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(InMemoryRepository::new());
            let cache = Arc::new(MemoryCache::new(config.cache_max_entries));

            tracing::info!(
                max_entries = config.cache_max_entries,
                "Using in-memory storage with in-memory cache"
            );

            Ok(Self::build(
                repo,
                cache,
                Arc::new(config.authenticator()),
                config,
            ))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "memory"))]
mod sqlite_memory {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage and in-memory cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let cache = Arc::new(MemoryCache::new(config.cache_max_entries));

            tracing::info!(
                path = %config.sqlite_path,
                max_entries = config.cache_max_entries,
                "Using SQLite storage with in-memory cache"
            );

            Ok(Self::build(
                repo,
                cache,
                Arc::new(config.authenticator()),
                config,
            ))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "redis"))]
mod inmemory_redis {
    use super::*;
    use crate::cache::RedisCache;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(InMemoryRepository::new());
            let cache = Arc::new(RedisCache::new(&config.redis_url).await?);

            tracing::info!(
                url = %config.redis_url,
                "Using in-memory storage with Redis cache"
            );

            Ok(Self::build(
                repo,
                cache,
                Arc::new(config.authenticator()),
                config,
            ))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "redis"))]
mod sqlite_redis {
    use super::*;
    use crate::cache::RedisCache;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let cache = Arc::new(RedisCache::new(&config.redis_url).await?);

            tracing::info!(
                path = %config.sqlite_path,
                url = %config.redis_url,
                "Using SQLite storage with Redis cache"
            );

            Ok(Self::build(
                repo,
                cache,
                Arc::new(config.authenticator()),
                config,
            ))
        }
    }
}

// ============================================================================
// Test support
// ============================================================================

#[cfg(test)]
mod test_support {
    use std::time::Duration;

    use bookshelf_core::auth::{Principal, StaticTokenAuthenticator};

    use super::*;
    use crate::cache::MemoryCache;
    use crate::config::{ADMIN_PRINCIPAL, USER_PRINCIPAL};
    use crate::services::{AuthorService, BookService};
    use crate::storage::InMemoryRepository;

    impl Default for AppState {
        /// Fresh in-memory backends with the default fixture tokens.
        fn default() -> Self {
            let repo = Arc::new(InMemoryRepository::new());
            let cache = Arc::new(MemoryCache::new(1_000));
            let ttl = Duration::from_secs(60);
            let authenticator = StaticTokenAuthenticator::new()
                .with_token("admin-token", Principal::admin(ADMIN_PRINCIPAL))
                .with_token("user-token", Principal::user(USER_PRINCIPAL));

            Self {
                authors: AuthorService::new(repo.clone(), repo.clone(), cache.clone(), ttl),
                books: BookService::new(repo.clone(), repo, cache, ttl),
                authenticator: Arc::new(authenticator),
            }
        }
    }
}

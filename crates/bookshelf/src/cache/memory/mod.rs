//! In-process tagged cache with LRU eviction.

mod cache;

pub use cache::MemoryCache;

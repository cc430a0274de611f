use std::fmt;

use crate::storage::Pagination;

/// Labels attached to cache entries so they can be evicted in bulk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    /// Every cached author listing.
    Authors,
    /// Every cached book listing.
    Books,
}

impl CacheTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheTag::Authors => "authorsCache",
            CacheTag::Books => "booksCache",
        }
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the cache key for one page of the author listing.
pub fn authors_list_key(pagination: Pagination) -> String {
    format!(
        "authors:list:page:{}:limit:{}",
        pagination.page(),
        pagination.limit()
    )
}

/// Returns the cache key for one page of the book listing.
pub fn books_list_key(pagination: Pagination) -> String {
    format!(
        "books:list:page:{}:limit:{}",
        pagination.page(),
        pagination.limit()
    )
}

/// Returns the key of the set that tracks every cache key carrying `tag`.
///
/// Backends without native tag support use this set as a secondary index so
/// a tag can be invalidated without scanning the keyspace.
pub fn tag_tracking_key(tag: CacheTag) -> String {
    format!("tag:{}:_keys", tag.as_str())
}

/// Formats a tag list for log fields.
pub fn format_tags(tags: &[CacheTag]) -> String {
    tags.iter()
        .map(CacheTag::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

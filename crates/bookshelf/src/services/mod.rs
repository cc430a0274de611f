//! Author and book operations shared by the HTTP handlers.
//!
//! Services own the cache-aside read path and evict cache tags after every
//! committed write. They hold repository and cache trait objects so any
//! backend combination can be plugged in.

mod authors;
mod books;
mod error;

pub use authors::AuthorService;
pub use books::BookService;
pub use error::{Result, ServiceError};

use bookshelf_core::cache::{format_tags, CacheTag, TaggedCache};

/// Evicts `tags`, logging instead of failing when the cache is unreachable.
async fn invalidate(cache: &dyn TaggedCache, tags: &[CacheTag]) {
    if let Err(err) = cache.invalidate_tags(tags).await {
        tracing::warn!(tags = %format_tags(tags), error = %err, "Failed to invalidate cache tags");
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use bookshelf_core::library::{Author, Book, NewAuthor, NewBook};
    use bookshelf_core::storage::{AuthorRepository, BookRepository, Pagination, Result};

    use super::{AuthorService, BookService};
    use crate::cache::MemoryCache;
    use crate::storage::InMemoryRepository;

    /// In-memory repository that counts listing queries.
    #[derive(Default)]
    pub struct CountingRepository {
        inner: InMemoryRepository,
        author_lists: AtomicUsize,
        book_lists: AtomicUsize,
    }

    impl CountingRepository {
        pub fn author_list_calls(&self) -> usize {
            self.author_lists.load(Ordering::SeqCst)
        }

        pub fn book_list_calls(&self) -> usize {
            self.book_lists.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AuthorRepository for CountingRepository {
        async fn get_author(&self, id: i64) -> Result<Option<Author>> {
            self.inner.get_author(id).await
        }

        async fn list_authors(&self, pagination: Pagination) -> Result<Vec<Author>> {
            self.author_lists.fetch_add(1, Ordering::SeqCst);
            self.inner.list_authors(pagination).await
        }

        async fn create_author(&self, author: &NewAuthor) -> Result<Author> {
            self.inner.create_author(author).await
        }

        async fn update_author(&self, author: &Author) -> Result<()> {
            self.inner.update_author(author).await
        }

        async fn delete_author(&self, id: i64) -> Result<()> {
            self.inner.delete_author(id).await
        }
    }

    #[async_trait]
    impl BookRepository for CountingRepository {
        async fn get_book(&self, id: i64) -> Result<Option<Book>> {
            self.inner.get_book(id).await
        }

        async fn list_books(&self, pagination: Pagination) -> Result<Vec<Book>> {
            self.book_lists.fetch_add(1, Ordering::SeqCst);
            self.inner.list_books(pagination).await
        }

        async fn list_books_by_author(&self, author_id: i64) -> Result<Vec<Book>> {
            self.inner.list_books_by_author(author_id).await
        }

        async fn create_book(&self, book: &NewBook) -> Result<Book> {
            self.inner.create_book(book).await
        }

        async fn update_book(&self, book: &Book) -> Result<()> {
            self.inner.update_book(book).await
        }

        async fn delete_book(&self, id: i64) -> Result<()> {
            self.inner.delete_book(id).await
        }
    }

    /// Both services over one counting repository and a fresh memory cache.
    pub fn services() -> (AuthorService, BookService, Arc<CountingRepository>) {
        let repo = Arc::new(CountingRepository::default());
        let cache = Arc::new(MemoryCache::new(100));
        let ttl = Duration::from_secs(60);

        let authors = AuthorService::new(repo.clone(), repo.clone(), cache.clone(), ttl);
        let books = BookService::new(repo.clone(), repo.clone(), cache, ttl);

        (authors, books, repo)
    }
}

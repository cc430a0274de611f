//! Author operations: cache-aside listing and tag invalidation on writes.

use std::sync::Arc;
use std::time::Duration;

use bookshelf_core::cache::{authors_list_key, get_or_compute, CacheTag, TaggedCache};
use bookshelf_core::library::{AuthorPatch, AuthorView, CreateAuthor, Validate};
use bookshelf_core::storage::{AuthorRepository, BookRepository, Pagination};

use super::error::{Result, ServiceError};
use super::invalidate;

/// Tags evicted when an author changes. Book views embed their author.
const AUTHOR_WRITE_TAGS: &[CacheTag] = &[CacheTag::Authors, CacheTag::Books];

#[derive(Clone)]
pub struct AuthorService {
    authors: Arc<dyn AuthorRepository>,
    books: Arc<dyn BookRepository>,
    cache: Arc<dyn TaggedCache>,
    ttl: Duration,
}

impl AuthorService {
    pub fn new(
        authors: Arc<dyn AuthorRepository>,
        books: Arc<dyn BookRepository>,
        cache: Arc<dyn TaggedCache>,
        ttl: Duration,
    ) -> Self {
        Self {
            authors,
            books,
            cache,
            ttl,
        }
    }

    /// Returns one page of authors as serialized `AuthorView` JSON.
    ///
    /// The bytes are cached under `authorsCache` keyed by page and limit.
    pub async fn list(&self, pagination: Pagination) -> Result<Vec<u8>> {
        let key = authors_list_key(pagination);

        get_or_compute(
            self.cache.as_ref(),
            &key,
            &[CacheTag::Authors],
            Some(self.ttl),
            || async {
                tracing::debug!(
                    page = pagination.page(),
                    limit = pagination.limit(),
                    "Loading authors page"
                );
                let authors = self.authors.list_authors(pagination).await?;

                let mut views = Vec::with_capacity(authors.len());
                for author in &authors {
                    let books = self.books.list_books_by_author(author.id).await?;
                    views.push(AuthorView::new(author, &books));
                }

                Ok::<_, ServiceError>(serde_json::to_vec(&views)?)
            },
        )
        .await
    }

    pub async fn get(&self, id: i64) -> Result<AuthorView> {
        let author = self
            .authors
            .get_author(id)
            .await?
            .ok_or_else(|| ServiceError::author_not_found(id))?;
        let books = self.books.list_books_by_author(id).await?;

        Ok(AuthorView::new(&author, &books))
    }

    pub async fn create(&self, payload: CreateAuthor) -> Result<AuthorView> {
        let new_author = payload.into_new_author();

        let violations = new_author.validate();
        if !violations.is_empty() {
            return Err(ServiceError::Validation(violations));
        }

        let author = self.authors.create_author(&new_author).await?;
        invalidate(self.cache.as_ref(), &[CacheTag::Authors]).await;

        tracing::debug!(author_id = author.id, "Author created");
        Ok(AuthorView::new(&author, &[]))
    }

    pub async fn update(&self, id: i64, patch: AuthorPatch) -> Result<()> {
        let mut author = self
            .authors
            .get_author(id)
            .await?
            .ok_or_else(|| ServiceError::author_not_found(id))?;

        patch.apply_to(&mut author);

        let violations = author.validate();
        if !violations.is_empty() {
            return Err(ServiceError::Validation(violations));
        }

        self.authors.update_author(&author).await?;
        invalidate(self.cache.as_ref(), AUTHOR_WRITE_TAGS).await;

        tracing::debug!(author_id = id, "Author updated");
        Ok(())
    }

    /// Deletes an author together with its books.
    pub async fn delete(&self, id: i64) -> Result<()> {
        if self.authors.get_author(id).await?.is_none() {
            return Err(ServiceError::author_not_found(id));
        }

        self.authors.delete_author(id).await?;
        invalidate(self.cache.as_ref(), AUTHOR_WRITE_TAGS).await;

        tracing::debug!(author_id = id, "Author deleted");
        Ok(())
    }

    /// Evicts every cached author listing.
    pub async fn clear_cache(&self) -> Result<()> {
        self.cache.invalidate_tags(&[CacheTag::Authors]).await?;
        tracing::info!(tag = %CacheTag::Authors, "Author cache cleared");
        Ok(())
    }
}

//! Book operations, including resolution of the linked author.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use bookshelf_core::cache::{books_list_key, get_or_compute, CacheTag, TaggedCache};
use bookshelf_core::library::{
    parse_book_create, requested_author_id, AuthorRef, Book, BookAuthor, BookPatch, BookView,
    PayloadError, Validate,
};
use bookshelf_core::storage::{AuthorRepository, BookRepository, Pagination};

use super::error::{Result, ServiceError};
use super::invalidate;

/// Tags evicted when a book changes. Author views embed their books.
const BOOK_WRITE_TAGS: &[CacheTag] = &[CacheTag::Books, CacheTag::Authors];

#[derive(Clone)]
pub struct BookService {
    books: Arc<dyn BookRepository>,
    authors: Arc<dyn AuthorRepository>,
    cache: Arc<dyn TaggedCache>,
    ttl: Duration,
}

impl BookService {
    pub fn new(
        books: Arc<dyn BookRepository>,
        authors: Arc<dyn AuthorRepository>,
        cache: Arc<dyn TaggedCache>,
        ttl: Duration,
    ) -> Self {
        Self {
            books,
            authors,
            cache,
            ttl,
        }
    }

    async fn view(&self, book: &Book) -> Result<BookView> {
        let author = match book.author_id {
            Some(author_id) => self.authors.get_author(author_id).await?,
            None => None,
        };
        Ok(BookView::new(book, author.as_ref()))
    }

    /// Returns one page of books as serialized `BookView` JSON, cached under
    /// `booksCache`.
    pub async fn list(&self, pagination: Pagination) -> Result<Vec<u8>> {
        let key = books_list_key(pagination);

        get_or_compute(
            self.cache.as_ref(),
            &key,
            &[CacheTag::Books],
            Some(self.ttl),
            || async {
                tracing::debug!(
                    page = pagination.page(),
                    limit = pagination.limit(),
                    "Loading books page"
                );
                let books = self.books.list_books(pagination).await?;

                let mut views = Vec::with_capacity(books.len());
                for book in &books {
                    views.push(self.view(book).await?);
                }

                Ok::<_, ServiceError>(serde_json::to_vec(&views)?)
            },
        )
        .await
    }

    pub async fn get(&self, id: i64) -> Result<BookView> {
        let book = self
            .books
            .get_book(id)
            .await?
            .ok_or_else(|| ServiceError::book_not_found(id))?;

        self.view(&book).await
    }

    /// Creates a book from a raw JSON body.
    ///
    /// `author` may be the ID of an existing author, an inline author object
    /// created alongside the book, or absent.
    pub async fn create(&self, body: Value) -> Result<BookView> {
        let (payload, author_ref) = parse_book_create(body)?;

        let author = match author_ref {
            None => None,
            Some(AuthorRef::Id(author_id)) => {
                if self.authors.get_author(author_id).await?.is_none() {
                    return Err(ServiceError::author_not_found(author_id));
                }
                Some(BookAuthor::Existing(author_id))
            }
            Some(AuthorRef::Inline(inline)) => Some(BookAuthor::New(inline.into_new_author())),
        };

        let new_book = payload.into_new_book(author);

        let violations = new_book.validate();
        if !violations.is_empty() {
            return Err(ServiceError::Validation(violations));
        }

        let book = self.books.create_book(&new_book).await?;
        invalidate(self.cache.as_ref(), BOOK_WRITE_TAGS).await;

        tracing::debug!(book_id = book.id, author_id = ?book.author_id, "Book created");
        self.view(&book).await
    }

    /// Overwrites the fields present in `body` and reassigns the author from
    /// `idAuthor`.
    ///
    /// An absent or unknown `idAuthor` leaves the book without an author.
    pub async fn update(&self, id: i64, body: Value) -> Result<()> {
        if !body.is_object() {
            return Err(PayloadError::NotAnObject.into());
        }

        let mut book = self
            .books
            .get_book(id)
            .await?
            .ok_or_else(|| ServiceError::book_not_found(id))?;

        let requested_author = requested_author_id(&body);
        let patch: BookPatch = serde_json::from_value(body)
            .map_err(|e| PayloadError::Malformed(e.to_string()))?;

        patch.apply_to(&mut book);
        book.author_id = self
            .authors
            .get_author(requested_author)
            .await?
            .map(|author| author.id);

        let violations = book.validate();
        if !violations.is_empty() {
            return Err(ServiceError::Validation(violations));
        }

        self.books.update_book(&book).await?;
        invalidate(self.cache.as_ref(), BOOK_WRITE_TAGS).await;

        tracing::debug!(book_id = id, author_id = ?book.author_id, "Book updated");
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if self.books.get_book(id).await?.is_none() {
            return Err(ServiceError::book_not_found(id));
        }

        invalidate(self.cache.as_ref(), BOOK_WRITE_TAGS).await;
        self.books.delete_book(id).await?;

        tracing::debug!(book_id = id, "Book deleted");
        Ok(())
    }

    /// Evicts every cached book listing.
    pub async fn clear_cache(&self) -> Result<()> {
        self.cache.invalidate_tags(&[CacheTag::Books]).await?;
        tracing::info!(tag = %CacheTag::Books, "Book cache cleared");
        Ok(())
    }
}

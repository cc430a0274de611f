use async_trait::async_trait;

use crate::library::{Author, Book, NewAuthor, NewBook};

use super::{Pagination, Result};

/// Repository for author operations.
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Gets an author by its ID.
    async fn get_author(&self, id: i64) -> Result<Option<Author>>;

    /// Gets one page of authors ordered by ascending ID.
    async fn list_authors(&self, pagination: Pagination) -> Result<Vec<Author>>;

    /// Stores a new author and returns it with its assigned ID.
    async fn create_author(&self, author: &NewAuthor) -> Result<Author>;

    /// Overwrites an existing author.
    async fn update_author(&self, author: &Author) -> Result<()>;

    /// Deletes an author and every book that references it.
    async fn delete_author(&self, id: i64) -> Result<()>;
}

/// Repository for book operations.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Gets a book by its ID.
    async fn get_book(&self, id: i64) -> Result<Option<Book>>;

    /// Gets one page of books ordered by ascending ID.
    async fn list_books(&self, pagination: Pagination) -> Result<Vec<Book>>;

    /// Gets every book written by an author, ordered by ascending ID.
    async fn list_books_by_author(&self, author_id: i64) -> Result<Vec<Book>>;

    /// Stores a new book, creating its inline author in the same write when
    /// there is one, and returns the stored book.
    async fn create_book(&self, book: &NewBook) -> Result<Book>;

    /// Overwrites an existing book, including its author link.
    async fn update_book(&self, book: &Book) -> Result<()>;

    /// Deletes a book by its ID.
    async fn delete_book(&self, id: i64) -> Result<()>;
}

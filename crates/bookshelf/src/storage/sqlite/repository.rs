//! SQLite repository implementation.

use async_trait::async_trait;
use tokio_rusqlite::Connection;

use bookshelf_core::library::{Author, Book, BookAuthor, NewAuthor, NewBook};
use bookshelf_core::storage::{
    AuthorRepository, BookRepository, Pagination, RepositoryError, Result,
};

use super::conversions::{page_params, row_to_author, row_to_book};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Fails with `QueryReturnedNoRows` when a write touched nothing.
fn expect_affected(rows: usize) -> tokio_rusqlite::Result<()> {
    if rows == 0 {
        Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
    } else {
        Ok(())
    }
}

/// SQLite-based repository implementation.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Opens (or creates) the database file at `path` and applies the schema.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a repository over a private in-memory database.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// AuthorRepository implementation
// ============================================================================

#[async_trait]
impl AuthorRepository for SqliteRepository {
    async fn get_author(&self, id: i64) -> Result<Option<Author>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_AUTHOR_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([id], row_to_author) {
                    Ok(author) => Ok(Some(author)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Author", id))
    }

    async fn list_authors(&self, pagination: Pagination) -> Result<Vec<Author>> {
        let (limit, offset) = page_params(pagination);

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_AUTHORS_PAGE)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([limit, offset], row_to_author)
                    .map_err(wrap_err)?;

                let mut authors = Vec::new();
                for row_result in rows {
                    authors.push(row_result.map_err(wrap_err)?);
                }
                Ok(authors)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Author", "unknown"))
    }

    async fn create_author(&self, author: &NewAuthor) -> Result<Author> {
        let author = author.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_AUTHOR,
                    rusqlite::params![author.first_name, author.last_name],
                )
                .map_err(wrap_err)?;
                let id = conn.last_insert_rowid();
                Ok(author.into_author(id))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Author", "unknown"))
    }

    async fn update_author(&self, author: &Author) -> Result<()> {
        let author = author.clone();
        let author_id = author.id;

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_AUTHOR,
                        rusqlite::params![author.id, author.first_name, author.last_name],
                    )
                    .map_err(wrap_err)?;
                expect_affected(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Author", author_id))
    }

    async fn delete_author(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_AUTHOR, [id])
                    .map_err(wrap_err)?;
                expect_affected(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Author", id))
    }
}

// ============================================================================
// BookRepository implementation
// ============================================================================

#[async_trait]
impl BookRepository for SqliteRepository {
    async fn get_book(&self, id: i64) -> Result<Option<Book>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_BOOK_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([id], row_to_book) {
                    Ok(book) => Ok(Some(book)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Book", id))
    }

    async fn list_books(&self, pagination: Pagination) -> Result<Vec<Book>> {
        let (limit, offset) = page_params(pagination);

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_BOOKS_PAGE).map_err(wrap_err)?;
                let rows = stmt
                    .query_map([limit, offset], row_to_book)
                    .map_err(wrap_err)?;

                let mut books = Vec::new();
                for row_result in rows {
                    books.push(row_result.map_err(wrap_err)?);
                }
                Ok(books)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Book", "unknown"))
    }

    async fn list_books_by_author(&self, author_id: i64) -> Result<Vec<Book>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_BOOKS_BY_AUTHOR)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([author_id], row_to_book)
                    .map_err(wrap_err)?;

                let mut books = Vec::new();
                for row_result in rows {
                    books.push(row_result.map_err(wrap_err)?);
                }
                Ok(books)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Book", "unknown"))
    }

    async fn create_book(&self, book: &NewBook) -> Result<Book> {
        let book = book.clone();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let author_id = match &book.author {
                    None => None,
                    Some(BookAuthor::Existing(author_id)) => Some(*author_id),
                    Some(BookAuthor::New(author)) => {
                        tx.execute(
                            schema::INSERT_AUTHOR,
                            rusqlite::params![author.first_name, author.last_name],
                        )
                        .map_err(wrap_err)?;
                        Some(tx.last_insert_rowid())
                    }
                };

                tx.execute(
                    schema::INSERT_BOOK,
                    rusqlite::params![book.title, book.cover_text, author_id],
                )
                .map_err(wrap_err)?;
                let id = tx.last_insert_rowid();

                tx.commit().map_err(wrap_err)?;

                Ok(book.into_book(id, author_id))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Book", "unknown"))
    }

    async fn update_book(&self, book: &Book) -> Result<()> {
        let book = book.clone();
        let book_id = book.id;

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_BOOK,
                        rusqlite::params![book.id, book.title, book.cover_text, book.author_id],
                    )
                    .map_err(wrap_err)?;
                expect_affected(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Book", book_id))
    }

    async fn delete_book(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn.execute(schema::DELETE_BOOK, [id]).map_err(wrap_err)?;
                expect_affected(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Book", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repo_with_author() -> (SqliteRepository, Author) {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let author = repo
            .create_author(&NewAuthor::new("Jules", "Verne"))
            .await
            .unwrap();
        (repo, author)
    }

    #[tokio::test]
    async fn test_create_and_get_author() {
        let (repo, author) = repo_with_author().await;

        assert_eq!(author.id, 1);
        assert_eq!(repo.get_author(author.id).await.unwrap(), Some(author));
        assert_eq!(repo.get_author(99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_authors_paginates() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        for i in 1..=7 {
            repo.create_author(&NewAuthor::new(format!("F{i}"), format!("L{i}")))
                .await
                .unwrap();
        }

        let page = repo.list_authors(Pagination::new(3, 3)).await.unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, 7);
    }

    #[tokio::test]
    async fn test_update_author() {
        let (repo, mut author) = repo_with_author().await;

        author.first_name = "Jules Gabriel".to_string();
        repo.update_author(&author).await.unwrap();

        let stored = repo.get_author(author.id).await.unwrap().unwrap();
        assert_eq!(stored.first_name, "Jules Gabriel");
    }

    #[tokio::test]
    async fn test_update_missing_author_is_not_found() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();

        let result = repo.update_author(&Author::new(5, "A", "B")).await;

        assert_eq!(result, Err(RepositoryError::not_found("Author", 5)));
    }

    #[tokio::test]
    async fn test_delete_author_cascades_to_books() {
        let (repo, author) = repo_with_author().await;
        repo.create_book(&NewBook::new("A", "").with_author(BookAuthor::Existing(author.id)))
            .await
            .unwrap();
        let authorless = repo.create_book(&NewBook::new("B", "")).await.unwrap();

        repo.delete_author(author.id).await.unwrap();

        assert!(repo.get_author(author.id).await.unwrap().is_none());
        assert_eq!(
            repo.list_books(Pagination::new(1, 50)).await.unwrap(),
            vec![authorless]
        );
    }

    #[tokio::test]
    async fn test_create_book_with_missing_author_is_rejected() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();

        let result = repo
            .create_book(&NewBook::new("Orphan", "").with_author(BookAuthor::Existing(12)))
            .await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
        assert!(repo.list_books(Pagination::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_book_with_inline_author_is_one_write() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();

        let book = repo
            .create_book(
                &NewBook::new("Five Weeks in a Balloon", "Africa from above")
                    .with_author(BookAuthor::New(NewAuthor::new("Jules", "Verne"))),
            )
            .await
            .unwrap();

        let author_id = book.author_id.unwrap();
        assert_eq!(
            repo.get_author(author_id).await.unwrap(),
            Some(Author::new(author_id, "Jules", "Verne"))
        );
        assert_eq!(repo.list_books_by_author(author_id).await.unwrap(), vec![book]);
    }

    #[tokio::test]
    async fn test_update_book_detaches_author() {
        let (repo, author) = repo_with_author().await;
        let book = repo
            .create_book(&NewBook::new("A", "").with_author(BookAuthor::Existing(author.id)))
            .await
            .unwrap();

        let detached = Book {
            author_id: None,
            ..book
        };
        repo.update_book(&detached).await.unwrap();

        assert_eq!(repo.get_book(detached.id).await.unwrap(), Some(detached));
        assert!(repo.list_books_by_author(author.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_book_is_not_found() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();

        assert_eq!(
            repo.delete_book(3).await,
            Err(RepositoryError::not_found("Book", 3))
        );
    }
}

//! SQLite row conversion functions.

use rusqlite::Row;

use bookshelf_core::library::{Author, Book};
use bookshelf_core::storage::Pagination;

/// Convert a SQLite row to an Author.
///
/// Expected columns: id, first_name, last_name
pub fn row_to_author(row: &Row) -> rusqlite::Result<Author> {
    Ok(Author {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
    })
}

/// Convert a SQLite row to a Book.
///
/// Expected columns: id, title, cover_text, author_id
pub fn row_to_book(row: &Row) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        cover_text: row.get(2)?,
        author_id: row.get(3)?,
    })
}

/// Returns `(limit, offset)` as SQLite integers.
pub fn page_params(pagination: Pagination) -> (i64, i64) {
    let offset = i64::try_from(pagination.offset()).unwrap_or(i64::MAX);
    (i64::from(pagination.limit()), offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_to_book_reads_null_author() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let book = conn
            .query_row("SELECT 4, 'Title', 'Cover', NULL", [], row_to_book)
            .unwrap();

        assert_eq!(book, Book::new(4, "Title", "Cover"));
    }

    #[test]
    fn test_row_to_author() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let author = conn
            .query_row("SELECT 1, 'Jules', 'Verne'", [], row_to_author)
            .unwrap();

        assert_eq!(author, Author::new(1, "Jules", "Verne"));
    }

    #[test]
    fn test_page_params() {
        assert_eq!(page_params(Pagination::new(3, 10)), (10, 20));
        assert_eq!(page_params(Pagination::default()), (3, 0));
    }
}

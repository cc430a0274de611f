//! SQLite schema definitions and SQL query constants.

/// Connection setup and table creation. Foreign keys are off by default in
/// SQLite and must be enabled per connection.
pub const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS authors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    cover_text TEXT NOT NULL,
    author_id INTEGER,
    FOREIGN KEY (author_id) REFERENCES authors(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_books_author_id ON books(author_id);
"#;

// Author queries
pub const INSERT_AUTHOR: &str = r#"
INSERT INTO authors (first_name, last_name)
VALUES (?1, ?2)
"#;

pub const SELECT_AUTHOR_BY_ID: &str = r#"
SELECT id, first_name, last_name
FROM authors
WHERE id = ?1
"#;

pub const SELECT_AUTHORS_PAGE: &str = r#"
SELECT id, first_name, last_name
FROM authors
ORDER BY id ASC
LIMIT ?1 OFFSET ?2
"#;

pub const UPDATE_AUTHOR: &str = r#"
UPDATE authors
SET first_name = ?2, last_name = ?3
WHERE id = ?1
"#;

pub const DELETE_AUTHOR: &str = r#"
DELETE FROM authors
WHERE id = ?1
"#;

// Book queries
pub const INSERT_BOOK: &str = r#"
INSERT INTO books (title, cover_text, author_id)
VALUES (?1, ?2, ?3)
"#;

pub const SELECT_BOOK_BY_ID: &str = r#"
SELECT id, title, cover_text, author_id
FROM books
WHERE id = ?1
"#;

pub const SELECT_BOOKS_PAGE: &str = r#"
SELECT id, title, cover_text, author_id
FROM books
ORDER BY id ASC
LIMIT ?1 OFFSET ?2
"#;

pub const SELECT_BOOKS_BY_AUTHOR: &str = r#"
SELECT id, title, cover_text, author_id
FROM books
WHERE author_id = ?1
ORDER BY id ASC
"#;

pub const UPDATE_BOOK: &str = r#"
UPDATE books
SET title = ?2, cover_text = ?3, author_id = ?4
WHERE id = ?1
"#;

pub const DELETE_BOOK: &str = r#"
DELETE FROM books
WHERE id = ?1
"#;

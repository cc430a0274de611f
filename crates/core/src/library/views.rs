//! JSON views of the `getBooks` serialization group.
//!
//! An author carries its books and a book carries its author, each one level
//! deep, so the author/book cycle is never expanded.

use serde::{Deserialize, Serialize};

use super::types::{Author, Book};

/// A book as embedded in an [`AuthorView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub id: i64,
    pub title: String,
    pub cover_text: String,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            cover_text: book.cover_text.clone(),
        }
    }
}

/// An author as embedded in a [`BookView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl From<&Author> for AuthorSummary {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorView {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub books: Vec<BookSummary>,
}

impl AuthorView {
    pub fn new(author: &Author, books: &[Book]) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            books: books.iter().map(BookSummary::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookView {
    pub id: i64,
    pub title: String,
    pub cover_text: String,
    pub author: Option<AuthorSummary>,
}

impl BookView {
    pub fn new(book: &Book, author: Option<&Author>) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            cover_text: book.cover_text.clone(),
            author: author.map(AuthorSummary::from),
        }
    }
}

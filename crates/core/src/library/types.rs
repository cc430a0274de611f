use serde::{Deserialize, Serialize};

/// A persisted author. The `id` is assigned by the store on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    /// Creates an author with a known ID.
    pub fn new(id: i64, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

/// A persisted book.
///
/// `author_id` is `None` for authorless books, which the create and update
/// operations still allow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub cover_text: String,
    pub author_id: Option<i64>,
}

impl Book {
    /// Creates a book with a known ID and no author.
    pub fn new(id: i64, title: impl Into<String>, cover_text: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            cover_text: cover_text.into(),
            author_id: None,
        }
    }

    /// Attaches the book to an author.
    pub fn with_author(mut self, author_id: i64) -> Self {
        self.author_id = Some(author_id);
        self
    }
}

/// An author that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
}

impl NewAuthor {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Binds the draft to the ID the store assigned to it.
    pub fn into_author(self, id: i64) -> Author {
        Author {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}

/// How a new book is linked to its author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookAuthor {
    /// An author row that already exists.
    Existing(i64),
    /// An author created in the same write as the book.
    New(NewAuthor),
}

/// A book that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewBook {
    pub title: String,
    pub cover_text: String,
    pub author: Option<BookAuthor>,
}

impl NewBook {
    pub fn new(title: impl Into<String>, cover_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            cover_text: cover_text.into(),
            author: None,
        }
    }

    pub fn with_author(mut self, author: BookAuthor) -> Self {
        self.author = Some(author);
        self
    }

    /// Binds the draft to the IDs the store assigned to the book and its author.
    pub fn into_book(self, id: i64, author_id: Option<i64>) -> Book {
        Book {
            id,
            title: self.title,
            cover_text: self.cover_text,
            author_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_author_into_author_keeps_fields() {
        let author = NewAuthor::new("Jules", "Verne").into_author(7);

        assert_eq!(author, Author::new(7, "Jules", "Verne"));
    }

    #[test]
    fn test_new_book_into_book_sets_ids() {
        let book = NewBook::new("Twenty Thousand Leagues", "Under the sea")
            .with_author(BookAuthor::Existing(3))
            .into_book(11, Some(3));

        assert_eq!(book.id, 11);
        assert_eq!(book.author_id, Some(3));
        assert_eq!(book.title, "Twenty Thousand Leagues");
    }

    #[test]
    fn test_book_with_author() {
        let book = Book::new(1, "Title", "Cover").with_author(4);
        assert_eq!(book.author_id, Some(4));
    }
}

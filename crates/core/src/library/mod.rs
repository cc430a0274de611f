mod error;
mod requests;
mod types;
mod validation;
mod views;

pub use error::PayloadError;
pub use requests::{
    parse_book_create, requested_author_id, AuthorPatch, AuthorRef, BookPatch, CreateAuthor,
    CreateBook, MISSING_AUTHOR_ID,
};
pub use types::{Author, Book, BookAuthor, NewAuthor, NewBook};
pub use validation::{Validate, Violation};
pub use views::{AuthorSummary, AuthorView, BookSummary, BookView};

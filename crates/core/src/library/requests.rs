//! Request payloads for the author and book endpoints.
//!
//! Every field is optional at the deserialization level: a missing field is
//! reported by validation as a violation, not as a parse failure.

use serde::Deserialize;
use serde_json::Value;

use super::error::PayloadError;
use super::types::{Author, Book, BookAuthor, NewAuthor, NewBook};

/// Author ID used when a book update does not carry `idAuthor`.
///
/// No store ever assigns it, so the lookup resolves to "no author".
pub const MISSING_AUTHOR_ID: i64 = -1;

/// Body of `POST /api/authors`, also used for inline authors on book creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthor {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl CreateAuthor {
    pub fn into_new_author(self) -> NewAuthor {
        NewAuthor {
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
        }
    }
}

/// Body of `PUT /api/authors/{id}`. Present fields overwrite the stored ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPatch {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl AuthorPatch {
    /// Applies the patch onto a loaded author, keeping its identity.
    pub fn apply_to(self, author: &mut Author) {
        if let Some(first_name) = self.first_name {
            author.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            author.last_name = last_name;
        }
    }
}

/// Book fields of `POST /api/books`, once `author` has been stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub cover_text: Option<String>,
}

impl CreateBook {
    pub fn into_new_book(self, author: Option<BookAuthor>) -> NewBook {
        NewBook {
            title: self.title.unwrap_or_default(),
            cover_text: self.cover_text.unwrap_or_default(),
            author,
        }
    }
}

/// Body of `PUT /api/books/{id}`. The author is reassigned separately through
/// [`requested_author_id`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub cover_text: Option<String>,
}

impl BookPatch {
    pub fn apply_to(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(cover_text) = self.cover_text {
            book.cover_text = cover_text;
        }
    }
}

/// The `author` field of a book creation body: either the ID of an existing
/// author or an inline author to create with the book.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AuthorRef {
    Id(i64),
    Inline(CreateAuthor),
}

/// Splits a book creation body into its book fields and its author reference.
///
/// `author` is removed before the book fields are decoded so the book decoder
/// never sees the nested author. An absent or `null` author yields `None`.
pub fn parse_book_create(body: Value) -> Result<(CreateBook, Option<AuthorRef>), PayloadError> {
    let Value::Object(mut fields) = body else {
        return Err(PayloadError::NotAnObject);
    };

    let author = match fields.remove("author") {
        None | Some(Value::Null) => None,
        Some(raw) => Some(serde_json::from_value::<AuthorRef>(raw).map_err(|_| {
            PayloadError::InvalidAuthor("expected an author id or an author object".to_string())
        })?),
    };

    let book = serde_json::from_value::<CreateBook>(Value::Object(fields))
        .map_err(|e| PayloadError::Malformed(e.to_string()))?;

    Ok((book, author))
}

/// Reads `idAuthor` from a raw book update body.
///
/// Accepts a JSON integer or a numeric string. Anything else, including an
/// absent field, falls back to [`MISSING_AUTHOR_ID`].
pub fn requested_author_id(body: &Value) -> i64 {
    body.get("idAuthor")
        .and_then(|value| {
            value
                .as_i64()
                .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        })
        .unwrap_or(MISSING_AUTHOR_ID)
}

//! Constraint checks run before anything is persisted.

use serde::Serialize;

use super::types::{Author, Book, BookAuthor, NewAuthor, NewBook};

const MAX_NAME_LENGTH: usize = 255;
const MAX_TITLE_LENGTH: usize = 255;
const MAX_COVER_TEXT_LENGTH: usize = 10_000;

/// A single failed constraint. `field` uses the JSON (camelCase) name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Types that can be checked against their constraints.
pub trait Validate {
    /// Returns every violation; an empty list means the value is valid.
    fn validate(&self) -> Vec<Violation>;

    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl Validate for NewAuthor {
    fn validate(&self) -> Vec<Violation> {
        author_violations("", &self.first_name, &self.last_name)
    }
}

impl Validate for Author {
    fn validate(&self) -> Vec<Violation> {
        author_violations("", &self.first_name, &self.last_name)
    }
}

impl Validate for NewBook {
    fn validate(&self) -> Vec<Violation> {
        let mut violations = book_violations(&self.title, &self.cover_text);
        if let Some(BookAuthor::New(author)) = &self.author {
            violations.extend(author_violations(
                "author.",
                &author.first_name,
                &author.last_name,
            ));
        }
        violations
    }
}

impl Validate for Book {
    fn validate(&self) -> Vec<Violation> {
        book_violations(&self.title, &self.cover_text)
    }
}

fn author_violations(prefix: &str, first_name: &str, last_name: &str) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_required(
        &mut violations,
        &format!("{prefix}firstName"),
        first_name,
        MAX_NAME_LENGTH,
    );
    check_required(
        &mut violations,
        &format!("{prefix}lastName"),
        last_name,
        MAX_NAME_LENGTH,
    );
    violations
}

fn book_violations(title: &str, cover_text: &str) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_required(&mut violations, "title", title, MAX_TITLE_LENGTH);
    if cover_text.chars().count() > MAX_COVER_TEXT_LENGTH {
        violations.push(Violation::new(
            "coverText",
            format!("must be at most {MAX_COVER_TEXT_LENGTH} characters"),
        ));
    }
    violations
}

fn check_required(violations: &mut Vec<Violation>, field: &str, value: &str, max: usize) {
    if value.trim().is_empty() {
        violations.push(Violation::new(field, "must not be blank"));
    } else if value.chars().count() > max {
        violations.push(Violation::new(
            field,
            format!("must be at most {max} characters"),
        ));
    }
}

use thiserror::Error;

/// Errors raised while turning a request body into domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Request body must be a JSON object")]
    NotAnObject,
    #[error("Invalid payload: {0}")]
    Malformed(String),
    #[error("Invalid author: {0}")]
    InvalidAuthor(String),
}

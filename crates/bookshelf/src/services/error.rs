use thiserror::Error;

use bookshelf_core::cache::CacheError;
use bookshelf_core::library::{PayloadError, Violation};
use bookshelf_core::storage::{repository_error_to_status_code, RepositoryError};

/// Failure of an author or book operation, classified by cause.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{entity_type} not found with id: {id}")]
    NotFound {
        entity_type: &'static str,
        id: i64,
    },

    #[error("Validation failed")]
    Validation(Vec<Violation>),

    #[error(transparent)]
    InvalidPayload(#[from] PayloadError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Cache unavailable: {0}")]
    Cache(#[from] CacheError),

    #[error("Failed to encode response: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl ServiceError {
    pub fn author_not_found(id: i64) -> Self {
        Self::NotFound {
            entity_type: "Author",
            id,
        }
    }

    pub fn book_not_found(id: i64) -> Self {
        Self::NotFound {
            entity_type: "Book",
            id,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) | Self::InvalidPayload(_) => 400,
            Self::Repository(err) => repository_error_to_status_code(err),
            Self::Cache(_) => 503,
            Self::Encoding(_) => 500,
        }
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

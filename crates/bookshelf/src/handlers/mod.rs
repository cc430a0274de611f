pub mod authors;
pub mod authz;
pub mod books;
pub mod error;
pub mod extract;
pub mod health;

pub use error::AppError;

use serde::Deserialize;

use bookshelf_core::storage::Pagination;

/// Raw `page` and `limit` query parameters. Kept as strings so bad values
/// fall back to the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListParams {
    pub fn pagination(&self) -> Pagination {
        Pagination::from_query(self.page.as_deref(), self.limit.as_deref())
    }
}

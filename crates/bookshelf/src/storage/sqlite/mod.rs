//! SQLite storage backend.
//!
//! Uses `rusqlite` for the queries and `tokio-rusqlite` to run them off the
//! async runtime. Foreign keys are enforced so deleting an author cascades to
//! its books.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;

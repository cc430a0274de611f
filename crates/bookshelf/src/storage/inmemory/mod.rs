//! In-memory storage backend.
//!
//! Keeps authors and books in ordered maps behind `Arc<RwLock<_>>`. Data is
//! lost when the repository is dropped.

mod repository;

pub use repository::InMemoryRepository;

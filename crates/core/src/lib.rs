//! Functional core for the bookshelf service.
//!
//! Pure domain types, payload parsing, validation and the traits implemented
//! by the storage, cache and authentication backends of the `bookshelf` binary.

pub mod auth;
pub mod cache;
pub mod library;
pub mod storage;

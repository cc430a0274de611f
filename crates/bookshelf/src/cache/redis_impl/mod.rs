//! Redis tagged cache for multi-instance deployments.

mod cache;
mod error;

pub use cache::RedisCache;

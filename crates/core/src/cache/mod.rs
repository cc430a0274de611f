mod aside;
mod error;
mod keys;
mod traits;

pub use aside::get_or_compute;
pub use error::{CacheError, Result};
pub use keys::{authors_list_key, books_list_key, format_tags, tag_tracking_key, CacheTag};
pub use traits::TaggedCache;

mod cache_key;

pub use cache_key::{CacheKeyBuilder, MAX_KEY_LEN};

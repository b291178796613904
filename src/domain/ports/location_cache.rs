//! Location Cache Port
//!
//! Defines the interface for the TTL key-value cache that memoizes
//! lookup results.

use crate::domain::entities::CachedLocation;
use async_trait::async_trait;
use std::time::Duration;

/// TTL key-value cache for resolved locations.
///
/// The cache is shared and externally synchronized. Callers only ever issue
/// a single `get` or a single `set`; there are no read-modify-write cycles.
/// Keys are built by [`CacheKeyBuilder`](crate::domain::services::CacheKeyBuilder).
#[async_trait]
pub trait LocationCache: Send + Sync {
    /// Get a live entry, or None if absent or expired.
    async fn get(&self, key: &str) -> Option<CachedLocation>;

    /// Store an entry that expires after `ttl`.
    async fn set(&self, key: &str, value: CachedLocation, ttl: Duration);
}

//! DashMap Location Cache
//!
//! Implements LocationCache using DashMap for lock-free concurrent access.

use crate::domain::entities::CachedLocation;
use crate::domain::ports::LocationCache;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry {
    value: CachedLocation,
    /// None when the TTL reaches past what `Instant` can represent
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// DashMap-backed TTL cache.
///
/// Expired entries are never returned. They are dropped lazily on `get`
/// and by the optional background garbage collection task.
pub struct DashMapLocationCache {
    entries: Arc<DashMap<String, CacheEntry>>,
}

impl DashMapLocationCache {
    /// Create a new, empty cache.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Start the background garbage collection task.
    ///
    /// Removes expired entries every `interval`.
    pub fn start_gc(&self, interval: Duration) {
        let entries = self.entries.clone();

        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;

                let removed = remove_expired(&entries, Instant::now());
                if removed > 0 {
                    tracing::debug!("location cache GC removed {} expired entries", removed);
                }
            }
        });
    }

    /// Remove all expired entries, returning how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        remove_expired(&self.entries, Instant::now())
    }

    /// Number of stored entries, expired ones included until collected.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DashMapLocationCache {
    fn default() -> Self {
        Self::new()
    }
}

fn remove_expired(entries: &DashMap<String, CacheEntry>, now: Instant) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| entry.is_live(now));
    before.saturating_sub(entries.len())
}

#[async_trait]
impl LocationCache for DashMapLocationCache {
    async fn get(&self, key: &str) -> Option<CachedLocation> {
        let now = Instant::now();

        if let Some(entry) = self.entries.get(key) {
            if entry.is_live(now) {
                return Some(entry.value.clone());
            }
        }

        self.entries.remove_if(key, |_, entry| !entry.is_live(now));
        None
    }

    async fn set(&self, key: &str, value: CachedLocation, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now().checked_add(ttl),
        };
        self.entries.insert(key.to_string(), entry);
    }
}

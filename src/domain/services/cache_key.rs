//! Cache Key Builder
//!
//! Deterministic cache keys from an ordered set of named attributes.

use sha2::{Digest, Sha256};
use url::form_urlencoded;

/// Longest key handed to the cache backend.
///
/// Memcached-style backends reject keys above 250 bytes.
pub const MAX_KEY_LEN: usize = 200;

/// Builds cache keys of the form `prefix:name1,name2:value1,value2`.
///
/// Each value is form-urlencoded before joining, so separators inside a
/// value cannot make two different queries share a key. If the key would
/// exceed [`MAX_KEY_LEN`], the value segment is replaced by its SHA-256
/// digest.
///
/// Attribute order is part of the key: every call site must always pass
/// its attributes in the same order.
#[derive(Debug, Clone)]
pub struct CacheKeyBuilder {
    prefix: String,
}

impl CacheKeyBuilder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Build the key for an ordered list of `(name, value)` attributes.
    ///
    /// # Examples
    /// ```
    /// use nominatim_locator::domain::services::CacheKeyBuilder;
    ///
    /// let keys = CacheKeyBuilder::new("nominatim");
    /// assert_eq!(
    ///     keys.build(&[("name", "New York"), ("language", "en")]),
    ///     "nominatim:name,language:New+York,en"
    /// );
    /// ```
    pub fn build(&self, attrs: &[(&str, &str)]) -> String {
        let names = attrs
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(",");

        let head = format!("{}:{}:", self.prefix, names);
        let budget = MAX_KEY_LEN.saturating_sub(head.len());
        let values = sanitize(attrs.iter().map(|(_, value)| *value), budget);

        head + &values
    }
}

/// Encode values into a key-safe segment of at most `budget` bytes
/// (or a fixed-length digest when the budget is smaller than that).
fn sanitize<'a>(values: impl Iterator<Item = &'a str>, budget: usize) -> String {
    let encoded = values
        .map(|value| form_urlencoded::byte_serialize(value.as_bytes()).collect::<String>())
        .collect::<Vec<_>>()
        .join(",");

    if encoded.len() <= budget {
        return encoded;
    }

    // ':' never survives encoding, so no literal value can spell a digest
    let digest = Sha256::digest(encoded.as_bytes());
    format!("sha256:{:x}", digest)
}

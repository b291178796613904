//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer tag partitioning location identifiers by the resolver that owns them.
///
/// Every resolver owns exactly one namespace. A location id is only
/// meaningful together with its namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(pub u32);

impl Namespace {
    /// Namespace of OpenStreetMap ids resolved through Nominatim.
    pub const NOMINATIM: Namespace = Namespace(2);

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonicalize a latitude or longitude string.
///
/// Strips every trailing `'0'`, then a single trailing `'.'`, so that
/// `"45.50"` and `"45.5"` collapse to the same value.
///
/// # Examples
/// ```
/// use nominatim_locator::domain::value_objects::canonicalize;
///
/// assert_eq!(canonicalize("45.500"), "45.5");
/// assert_eq!(canonicalize("45.000"), "45");
/// assert_eq!(canonicalize("45"), "45");
/// ```
pub fn canonicalize(coord: &str) -> String {
    let trimmed = coord.trim_end_matches('0');
    trimmed.strip_suffix('.').unwrap_or(trimmed).to_string()
}

/// A canonicalized latitude/longitude pair.
///
/// Both components are run through [`canonicalize`] on construction,
/// which makes the pair usable as a stable cache key component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: String,
    pub lon: String,
}

impl LatLon {
    pub fn new(lat: &str, lon: &str) -> Self {
        Self {
            lat: canonicalize(lat),
            lon: canonicalize(lon),
        }
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Geocoding service method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeocodeMethod {
    /// Forward geocoding: free-text name to place
    Search,
    /// Reverse geocoding: coordinates or OSM id to place
    Reverse,
}

impl GeocodeMethod {
    /// Path segment of the method on the service.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Reverse => "reverse",
        }
    }
}

impl fmt::Display for GeocodeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Domain Entities - Core business objects
//!
//! These entities represent the core concepts of the location domain.
//! They have no external dependencies beyond serde and contain only
//! business logic.

use crate::domain::value_objects::Namespace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A resolved geographic entity.
///
/// Produced by a resolver from a name, an id or a coordinate pair.
/// The `namespace` tells which resolver owns the `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Opaque identifier, specific to the owning service (e.g. an OSM node id)
    pub id: String,
    /// Namespace of the resolver that produced this location
    pub namespace: Namespace,
    /// Canonicalized decimal latitude
    pub latitude: String,
    /// Canonicalized decimal longitude
    pub longitude: String,
    /// Display names keyed by language code
    pub names: BTreeMap<String, String>,
}

impl Location {
    pub fn new(
        id: impl Into<String>,
        namespace: Namespace,
        latitude: impl Into<String>,
        longitude: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            namespace,
            latitude: latitude.into(),
            longitude: longitude.into(),
            names: BTreeMap::new(),
        }
    }

    /// Builder-style variant of [`Location::add_name`].
    pub fn with_name(mut self, language: impl Into<String>, name: impl Into<String>) -> Self {
        self.add_name(language, name);
        self
    }

    /// Record the display name for a language, replacing any previous one.
    pub fn add_name(&mut self, language: impl Into<String>, name: impl Into<String>) {
        self.names.insert(language.into(), name.into());
    }

    /// Display name in the given language, if known.
    pub fn name(&self, language: &str) -> Option<&str> {
        self.names.get(language).map(String::as_str)
    }

    /// Whether this location belongs to the given namespace.
    pub fn belongs_to(&self, namespace: Namespace) -> bool {
        self.namespace == namespace
    }
}

/// Value stored in the location cache.
///
/// A definitive "no such place" answer is cached as [`CachedLocation::NotFound`]
/// so repeated lookups of unknown places do not hit the service again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CachedLocation {
    Found(Location),
    NotFound,
}

impl CachedLocation {
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::Found(location) => Some(location),
            Self::NotFound => None,
        }
    }

    pub fn into_location(self) -> Option<Location> {
        match self {
            Self::Found(location) => Some(location),
            Self::NotFound => None,
        }
    }
}

impl From<Option<Location>> for CachedLocation {
    fn from(value: Option<Location>) -> Self {
        value.map_or(Self::NotFound, Self::Found)
    }
}

/// Administrative breakdown of a place's address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressParts {
    pub town: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl AddressParts {
    /// Present parts, most specific first: town, city, state, country.
    ///
    /// Absent and empty parts are skipped. Overlapping names at two levels
    /// are kept as-is.
    pub fn parts(&self) -> Vec<&str> {
        [&self.town, &self.city, &self.state, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect()
    }

    /// Comma-joined [`AddressParts::parts`].
    ///
    /// # Examples
    /// ```
    /// use nominatim_locator::domain::entities::AddressParts;
    ///
    /// let address = AddressParts {
    ///     city: Some("Montreal".into()),
    ///     country: Some("Canada".into()),
    ///     ..Default::default()
    /// };
    /// assert_eq!(address.display_name(), "Montreal, Canada");
    /// ```
    pub fn display_name(&self) -> String {
        self.parts().join(", ")
    }
}

/// A single place returned by the geocoding service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    /// OpenStreetMap id of the place
    pub osm_id: String,
    /// Latitude as returned by the service (not canonicalized)
    pub lat: String,
    /// Longitude as returned by the service (not canonicalized)
    pub lon: String,
    /// Full display name, when the service provides one
    pub display_name: Option<String>,
    /// Address breakdown (all parts may be absent)
    pub address: AddressParts,
}

/// Typed result of parsing a geocoding service response.
///
/// A document with neither `place` nor `error` is the explicit
/// "zero results" answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    /// First result element, if any
    pub place: Option<Place>,
    /// Error element embedded in the document
    pub error: Option<String>,
}

impl ParsedDocument {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_place(place: Place) -> Self {
        Self {
            place: Some(place),
            error: None,
        }
    }

    /// True when the service answered with zero results.
    pub fn is_empty(&self) -> bool {
        self.place.is_none() && self.error.is_none()
    }
}

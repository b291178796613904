//! Geocoder Port
//!
//! Defines the interface for querying a forward/reverse geocoding service.

use crate::domain::entities::ParsedDocument;
use crate::domain::error::GeocodeError;
use crate::domain::value_objects::{GeocodeMethod, LatLon};
use async_trait::async_trait;

/// A single request to the geocoding service: a method plus its
/// query parameters, in the order they are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeQuery {
    pub method: GeocodeMethod,
    pub params: Vec<(String, String)>,
}

impl GeocodeQuery {
    pub fn new(method: GeocodeMethod) -> Self {
        Self {
            method,
            params: Vec::new(),
        }
    }

    /// Append a query parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Forward lookup of a free-text name, capped at one match.
    pub fn search(name: &str, language: &str) -> Self {
        Self::new(GeocodeMethod::Search)
            .param("q", name)
            .param("limit", "1")
            .param("accept-language", language)
    }

    /// Reverse lookup of an OSM node id.
    pub fn reverse_by_id(id: &str) -> Self {
        Self::new(GeocodeMethod::Reverse)
            .param("osm_type", "N")
            .param("osm_id", id)
    }

    /// Reverse lookup of a coordinate pair.
    pub fn reverse_by_coordinates(point: &LatLon, language: &str) -> Self {
        Self::new(GeocodeMethod::Reverse)
            .param("lat", point.lat.as_str())
            .param("lon", point.lon.as_str())
            .param("accept-language", language)
    }

    /// Value of the first parameter with this name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Client for a geocoding web service.
///
/// This is an outbound port. Implementations talk to Nominatim or any
/// compatible service and translate its response into a [`ParsedDocument`].
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Run a query against the service.
    ///
    /// Zero results is an `Ok` empty document; every failure to get a
    /// usable answer is a [`GeocodeError`].
    async fn query(&self, query: &GeocodeQuery) -> Result<ParsedDocument, GeocodeError>;
}

//! Location Provider Port
//!
//! Defines the capability set a host expects from a location resolver.
//! The host keeps an ordered list of providers and asks each in turn.

use crate::domain::entities::Location;
use crate::domain::value_objects::Namespace;
use async_trait::async_trait;

/// Outcome of a single provider lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Resolved. Dispatch stops here.
    Found(Location),
    /// No location known, or the service could not be asked.
    /// The next provider may try.
    NotFound,
    /// The request is outside this provider's namespace.
    /// The next provider may try.
    Declined,
    /// The id is in this provider's namespace but could not be resolved.
    /// Dispatch stops here: nobody else owns this namespace.
    Unresolvable,
}

impl Lookup {
    /// Whether the host should stop asking further providers.
    pub fn ends_dispatch(&self) -> bool {
        matches!(self, Self::Found(_) | Self::Unresolvable)
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::Found(location) => Some(location),
            _ => None,
        }
    }

    pub fn into_location(self) -> Option<Location> {
        match self {
            Self::Found(location) => Some(location),
            _ => None,
        }
    }
}

/// Location resolver exposed to the host.
///
/// This is an inbound port. None of these operations fail: transport and
/// service errors are logged and folded into the [`Lookup`] outcome.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Resolve a human-entered place name.
    async fn location_from_name(&self, name: &str, language: &str) -> Lookup;

    /// Resolve an opaque id within a namespace.
    async fn location_from_id(&self, id: &str, namespace: Namespace, language: &str) -> Lookup;

    /// Resolve a latitude/longitude pair to the place around it.
    async fn location_from_lat_lon(&self, lat: &str, lon: &str, language: &str) -> Lookup;

    /// Human-readable map URL, or None for foreign locations.
    fn url_for(&self, location: &Location) -> Option<String>;

    /// Machine-readable linked-data URL, or None for foreign locations.
    fn linked_data_url_for(&self, location: &Location) -> Option<String>;
}

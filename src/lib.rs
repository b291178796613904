//! nominatim-locator Library
//!
//! Resolves place names, OpenStreetMap node ids and coordinates to
//! locations through a Nominatim geocoding service, with a TTL cache in
//! front and a back-off window after service failures.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use adapters::outbound::{DashMapLocationCache, NominatimClient};
pub use application::{LocationService, NominatimResolver};
pub use config::{load_config, Config, ConfigError};
pub use domain::entities::{CachedLocation, Location};
pub use domain::error::GeocodeError;
pub use domain::ports::{Clock, Geocoder, LocationCache, LocationProvider, Lookup};
pub use domain::value_objects::{LatLon, Namespace};

//! Domain Layer
//!
//! Entities, value objects, ports and pure services of the location domain.

pub mod entities;
pub mod error;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{AddressParts, CachedLocation, Location, ParsedDocument, Place};
pub use error::GeocodeError;
pub use value_objects::{canonicalize, GeocodeMethod, LatLon, Namespace};

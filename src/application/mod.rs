//! Application Layer
//!
//! Contains use cases that orchestrate domain logic.
//! Depends only on domain ports (traits), not concrete implementations.

mod location_service;
mod nominatim_resolver;

pub use location_service::LocationService;
pub use nominatim_resolver::{NominatimResolver, CACHE_PREFIX};

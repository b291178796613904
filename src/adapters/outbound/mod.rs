//! Outbound Adapters
//!
//! Implementations of domain ports for external systems.

mod dashmap_location_cache;
mod nominatim_client;
mod nominatim_document;

pub use dashmap_location_cache::DashMapLocationCache;
pub use nominatim_client::{NominatimClient, USER_AGENT};
pub use nominatim_document::parse_document;

mod clock;
mod geocoder;
mod location_cache;
mod location_provider;

pub use clock::Clock;
pub use geocoder::{GeocodeQuery, Geocoder};
pub use location_cache::LocationCache;
pub use location_provider::{LocationProvider, Lookup};

//! Nominatim Resolver - Main application use case
//!
//! Orchestrates cache lookup, geocoding and cache store for the three lookup
//! directions, and projects Nominatim locations to URLs.

use crate::config::Config;
use crate::domain::entities::{CachedLocation, Location, Place};
use crate::domain::ports::{GeocodeQuery, Geocoder, LocationCache, LocationProvider, Lookup};
use crate::domain::services::CacheKeyBuilder;
use crate::domain::value_objects::{canonicalize, LatLon, Namespace};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Prefix of every cache key written by this resolver.
pub const CACHE_PREFIX: &str = "nominatim";

/// Location resolver backed by a Nominatim geocoder.
///
/// Owns the [`Namespace::NOMINATIM`] id namespace. Every lookup:
/// 1. Checks the cache (a cached not-found marker counts as a hit)
/// 2. On miss, queries the geocoder
/// 3. Caches definitive outcomes (a location or "no such place")
///
/// Transient failures are logged and never cached.
pub struct NominatimResolver {
    geocoder: Arc<dyn Geocoder>,
    cache: Arc<dyn LocationCache>,
    keys: CacheKeyBuilder,
    expiry: Duration,
    credits: String,
}

impl NominatimResolver {
    /// Create a new resolver.
    ///
    /// # Arguments
    /// * `geocoder` - Client for the geocoding service
    /// * `cache` - TTL cache for lookup results
    /// * `expiry` - How long results stay cached
    pub fn new(geocoder: Arc<dyn Geocoder>, cache: Arc<dyn LocationCache>, expiry: Duration) -> Self {
        Self {
            geocoder,
            cache,
            keys: CacheKeyBuilder::new(CACHE_PREFIX),
            expiry,
            credits: String::new(),
        }
    }

    /// Create a resolver with expiry and credits taken from configuration.
    pub fn from_config(
        cfg: &Config,
        geocoder: Arc<dyn Geocoder>,
        cache: Arc<dyn LocationCache>,
    ) -> Self {
        Self::new(geocoder, cache, Duration::from_secs(cfg.expiry_secs))
            .with_credits(cfg.credits.clone())
    }

    /// Attribution HTML to show to end users.
    pub fn with_credits(mut self, credits: impl Into<String>) -> Self {
        self.credits = credits.into();
        self
    }

    pub fn credits(&self) -> &str {
        &self.credits
    }

    pub fn namespace(&self) -> Namespace {
        Namespace::NOMINATIM
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    pub fn name_key(&self, name: &str, language: &str) -> String {
        self.keys.build(&[("name", name), ("language", language)])
    }

    pub fn id_key(&self, id: &str) -> String {
        self.keys.build(&[("id", id)])
    }

    pub fn lat_lon_key(&self, point: &LatLon) -> String {
        self.keys.build(&[("lat", &point.lat), ("lon", &point.lon)])
    }

    async fn store(&self, key: &str, value: CachedLocation) {
        self.cache.set(key, value, self.expiry).await;
    }

    fn location_from_place(&self, place: &Place, language: &str, name: String) -> Location {
        Location::new(
            place.osm_id.clone(),
            Namespace::NOMINATIM,
            canonicalize(&place.lat),
            canonicalize(&place.lon),
        )
        .with_name(language, name)
    }
}

fn from_cache(hit: CachedLocation) -> Lookup {
    match hit {
        CachedLocation::Found(location) => Lookup::Found(location),
        CachedLocation::NotFound => Lookup::NotFound,
    }
}

#[async_trait]
impl LocationProvider for NominatimResolver {
    async fn location_from_name(&self, name: &str, language: &str) -> Lookup {
        let key = self.name_key(name, language);

        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!("cache hit for name {:?} ({})", name, language);
            return from_cache(hit);
        }

        let document = match self.geocoder.query(&GeocodeQuery::search(name, language)).await {
            Ok(doc) => doc,
            Err(e) => {
                tracing::debug!("error for {:?}: {}", name, e);
                return Lookup::NotFound;
            }
        };

        let Some(place) = document.place else {
            self.store(&key, CachedLocation::NotFound).await;
            return Lookup::NotFound;
        };

        let display_name = place.display_name.clone().unwrap_or_default();
        let location = self.location_from_place(&place, language, display_name);
        self.store(&key, CachedLocation::Found(location.clone())).await;

        Lookup::Found(location)
    }

    async fn location_from_id(&self, id: &str, namespace: Namespace, language: &str) -> Lookup {
        if namespace != Namespace::NOMINATIM {
            return Lookup::Declined;
        }

        if let Some(hit) = self.cache.get(&self.id_key(id)).await {
            tracing::debug!("cache hit for id {}", id);
            return match from_cache(hit) {
                Lookup::NotFound => Lookup::Unresolvable,
                other => other,
            };
        }

        let document = match self.geocoder.query(&GeocodeQuery::reverse_by_id(id)).await {
            Ok(doc) => doc,
            Err(e) => {
                tracing::debug!("error for ID {}: {}", id, e);
                return Lookup::Unresolvable;
            }
        };

        let Some(place) = document.place else {
            self.store(&self.id_key(id), CachedLocation::NotFound).await;
            return Lookup::Unresolvable;
        };

        let display_name = place.address.display_name();
        let location = self.location_from_place(&place, language, display_name);
        // keyed by the id the service answered with
        self.store(&self.id_key(&location.id), CachedLocation::Found(location.clone()))
            .await;

        Lookup::Found(location)
    }

    async fn location_from_lat_lon(&self, lat: &str, lon: &str, language: &str) -> Lookup {
        let point = LatLon::new(lat, lon);
        let key = self.lat_lon_key(&point);

        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!("cache hit for coords {}", point);
            return from_cache(hit);
        }

        let query = GeocodeQuery::reverse_by_coordinates(&point, language);
        let document = match self.geocoder.query(&query).await {
            Ok(doc) => doc,
            Err(e) => {
                tracing::debug!("error for coords {}, {}: {}", point.lat, point.lon, e);
                return Lookup::NotFound;
            }
        };

        let Some(place) = document.place else {
            self.store(&key, CachedLocation::NotFound).await;
            return Lookup::NotFound;
        };

        let display_name = place.address.display_name();
        let location = self.location_from_place(&place, language, display_name);
        self.store(&key, CachedLocation::Found(location.clone())).await;

        Lookup::Found(location)
    }

    fn url_for(&self, location: &Location) -> Option<String> {
        if !location.belongs_to(Namespace::NOMINATIM) {
            return None;
        }

        Some(format!(
            "https://www.openstreetmap.org/?mlat={}&mlon={}",
            location.latitude, location.longitude
        ))
    }

    fn linked_data_url_for(&self, location: &Location) -> Option<String> {
        if !location.belongs_to(Namespace::NOMINATIM) {
            return None;
        }

        Some(format!(
            "http://linkedgeodata.org/data/triplify/node{}?output=xml",
            location.id
        ))
    }
}

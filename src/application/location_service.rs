//! Location Service
//!
//! Dispatches lookups across an ordered chain of location providers.

use crate::domain::entities::Location;
use crate::domain::ports::{LocationProvider, Lookup};
use crate::domain::value_objects::Namespace;
use std::sync::Arc;

/// Ordered chain of providers.
///
/// Lookups ask each provider in turn and stop at the first outcome that
/// ends dispatch: a location, or a provider claiming the id as its own but
/// unable to resolve it. URL projections stop at the first provider that
/// recognizes the location.
#[derive(Default, Clone)]
pub struct LocationService {
    providers: Vec<Arc<dyn LocationProvider>>,
}

impl LocationService {
    pub fn new(providers: Vec<Arc<dyn LocationProvider>>) -> Self {
        Self { providers }
    }

    /// Append a provider at the end of the chain.
    pub fn with_provider(mut self, provider: Arc<dyn LocationProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub async fn location_from_name(&self, name: &str, language: &str) -> Option<Location> {
        for provider in &self.providers {
            let lookup = provider.location_from_name(name, language).await;
            if lookup.ends_dispatch() {
                return lookup.into_location();
            }
        }
        None
    }

    pub async fn location_from_id(
        &self,
        id: &str,
        namespace: Namespace,
        language: &str,
    ) -> Option<Location> {
        for provider in &self.providers {
            let lookup = provider.location_from_id(id, namespace, language).await;
            if lookup.ends_dispatch() {
                if lookup == Lookup::Unresolvable {
                    tracing::debug!("id {} in namespace {} is unresolvable", id, namespace);
                }
                return lookup.into_location();
            }
        }
        None
    }

    pub async fn location_from_lat_lon(
        &self,
        lat: &str,
        lon: &str,
        language: &str,
    ) -> Option<Location> {
        for provider in &self.providers {
            let lookup = provider.location_from_lat_lon(lat, lon, language).await;
            if lookup.ends_dispatch() {
                return lookup.into_location();
            }
        }
        None
    }

    pub fn url_for(&self, location: &Location) -> Option<String> {
        self.providers.iter().find_map(|p| p.url_for(location))
    }

    pub fn linked_data_url_for(&self, location: &Location) -> Option<String> {
        self.providers
            .iter()
            .find_map(|p| p.linked_data_url_for(location))
    }
}

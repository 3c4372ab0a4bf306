//! Geocoding, routing and place search
//!
//! Provider contracts used by the address resolver, plus the Google Maps
//! web-service implementation of all of them.

pub mod google;
pub mod resolver;

use crate::constants::api::PROVIDER_OK;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

pub use resolver::AddressResolver;

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }

    /// "lat,lng" as the mapping provider expects it in query strings
    pub fn to_query(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

/// A place picked from autocomplete
///
/// `anchor` is the provider's geometry point. It is only used as a routing
/// destination, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDescriptor {
    pub formatted_address: String,
    pub anchor: Option<Coordinates>,
}

impl PlaceDescriptor {
    pub fn new(formatted_address: impl Into<String>, anchor: Coordinates) -> Self {
        Self {
            formatted_address: formatted_address.into(),
            anchor: Some(anchor),
        }
    }
}

/// Outcome of one successful resolution: the address to store and the
/// route leg endpoint that goes with it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub formatted_address: String,
    pub coordinates: Coordinates,
}

/// Autocomplete restrictions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocompleteOptions {
    /// ISO country code results are restricted to
    pub country: String,
    /// Result types, e.g. "address"
    pub types: Vec<String>,
}

impl AutocompleteOptions {
    /// Address-type results within one country
    pub fn addresses_in(country: &str) -> Self {
        Self {
            country: country.to_uppercase(),
            types: vec!["address".to_string()],
        }
    }
}

/// One autocomplete suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    pub place_id: String,
    pub description: String,
}

/// A single reverse-geocoding hit
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub location: Coordinates,
}

/// Reverse-geocoding answer with the provider's status carried verbatim
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResponse {
    pub status: String,
    pub results: Vec<GeocodeResult>,
}

impl GeocodeResponse {
    pub fn is_ok(&self) -> bool {
        self.status == PROVIDER_OK
    }

    /// First result of a successful lookup
    pub fn first(&self) -> Option<&GeocodeResult> {
        if self.is_ok() {
            self.results.first()
        } else {
            None
        }
    }
}

/// Travel mode for route computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TravelMode {
    #[default]
    Driving,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
        }
    }
}

/// Route computation input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub mode: TravelMode,
}

/// One segment of a route
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    pub start_location: Coordinates,
    pub end_location: Coordinates,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub legs: Vec<RouteLeg>,
}

/// Routing answer with the provider's status carried verbatim
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsResponse {
    pub status: String,
    pub routes: Vec<Route>,
}

impl DirectionsResponse {
    pub fn is_ok(&self) -> bool {
        self.status == PROVIDER_OK
    }

    /// End of the last leg of the first route
    pub fn leg_endpoint(&self) -> Option<Coordinates> {
        if !self.is_ok() {
            return None;
        }
        self.routes
            .first()
            .and_then(|route| route.legs.last())
            .map(|leg| leg.end_location)
    }
}

/// Reverse-geocoding provider
///
/// `Err` means the request itself failed; a non-OK status is an `Ok`
/// response the caller has to inspect.
pub trait Geocoder: Send + Sync {
    fn reverse_geocode(
        &self,
        at: Coordinates,
    ) -> impl Future<Output = Result<GeocodeResponse>> + Send;
}

/// Routing provider
pub trait DirectionsProvider: Send + Sync {
    fn route(
        &self,
        request: RouteRequest,
    ) -> impl Future<Output = Result<DirectionsResponse>> + Send;
}

/// Place autocomplete provider
pub trait PlaceSearch: Send + Sync {
    /// Suggestions for partial input, most relevant first
    fn autocomplete(
        &self,
        input: &str,
        options: &AutocompleteOptions,
    ) -> impl Future<Output = Result<Vec<PlaceSuggestion>>> + Send;

    /// Address and geometry of a picked suggestion, None if unknown
    fn place_details(
        &self,
        place_id: &str,
    ) -> impl Future<Output = Result<Option<PlaceDescriptor>>> + Send;
}

impl<T: Geocoder> Geocoder for Arc<T> {
    fn reverse_geocode(
        &self,
        at: Coordinates,
    ) -> impl Future<Output = Result<GeocodeResponse>> + Send {
        (**self).reverse_geocode(at)
    }
}

impl<T: DirectionsProvider> DirectionsProvider for Arc<T> {
    fn route(
        &self,
        request: RouteRequest,
    ) -> impl Future<Output = Result<DirectionsResponse>> + Send {
        (**self).route(request)
    }
}

impl<T: PlaceSearch> PlaceSearch for Arc<T> {
    fn autocomplete(
        &self,
        input: &str,
        options: &AutocompleteOptions,
    ) -> impl Future<Output = Result<Vec<PlaceSuggestion>>> + Send {
        (**self).autocomplete(input, options)
    }

    fn place_details(
        &self,
        place_id: &str,
    ) -> impl Future<Output = Result<Option<PlaceDescriptor>>> + Send {
        (**self).place_details(place_id)
    }
}

//! Google Maps web-service backend
//!
//! Reverse geocoding, directions, place autocomplete and place details over
//! the JSON APIs. Provider statuses are passed through untouched; only
//! transport and decoding problems become errors.

use crate::config::MapsConfig;
use crate::constants::api::PROVIDER_OK;
use crate::error::{Error, Result};
use crate::geo::{
    AutocompleteOptions, Coordinates, DirectionsProvider, DirectionsResponse, GeocodeResponse,
    GeocodeResult, Geocoder, PlaceDescriptor, PlaceSearch, PlaceSuggestion, Route, RouteLeg,
    RouteRequest,
};
use serde::Deserialize;
use tracing::debug;

const USER_AGENT: &str = concat!("client-intake/", env!("CARGO_PKG_VERSION"));

/// Google Maps client
#[derive(Debug, Clone)]
pub struct GoogleMapsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct LatLngJson {
    lat: f64,
    lng: f64,
}

impl From<LatLngJson> for Coordinates {
    fn from(value: LatLngJson) -> Self {
        Coordinates::new(value.lat, value.lng)
    }
}

#[derive(Debug, Deserialize)]
struct GeometryJson {
    location: LatLngJson,
}

#[derive(Debug, Deserialize)]
struct GeocodeJson {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResultJson>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResultJson {
    formatted_address: String,
    geometry: GeometryJson,
}

#[derive(Debug, Deserialize)]
struct DirectionsJson {
    status: String,
    #[serde(default)]
    routes: Vec<RouteJson>,
}

#[derive(Debug, Deserialize)]
struct RouteJson {
    #[serde(default)]
    legs: Vec<LegJson>,
}

#[derive(Debug, Deserialize)]
struct LegJson {
    start_location: LatLngJson,
    end_location: LatLngJson,
}

#[derive(Debug, Deserialize)]
struct AutocompleteJson {
    status: String,
    #[serde(default)]
    predictions: Vec<PredictionJson>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PredictionJson {
    description: String,
    place_id: String,
}

#[derive(Debug, Deserialize)]
struct DetailsJson {
    status: String,
    result: Option<DetailsResultJson>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResultJson {
    formatted_address: String,
    geometry: Option<GeometryJson>,
}

impl GoogleMapsClient {
    /// Create a client from the maps configuration
    pub fn new(config: &MapsConfig) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn reverse_geocode_url(&self, at: Coordinates) -> String {
        format!(
            "{}/geocode/json?latlng={}&key={}",
            self.base_url,
            at.to_query(),
            urlencoding::encode(&self.api_key)
        )
    }

    fn directions_url(&self, request: &RouteRequest) -> String {
        format!(
            "{}/directions/json?origin={}&destination={}&mode={}&key={}",
            self.base_url,
            request.origin.to_query(),
            request.destination.to_query(),
            request.mode.as_str(),
            urlencoding::encode(&self.api_key)
        )
    }

    fn autocomplete_url(&self, input: &str, options: &AutocompleteOptions) -> String {
        format!(
            "{}/place/autocomplete/json?input={}&components=country:{}&types={}&key={}",
            self.base_url,
            urlencoding::encode(input),
            options.country.to_lowercase(),
            urlencoding::encode(&options.types.join("|")),
            urlencoding::encode(&self.api_key)
        )
    }

    fn details_url(&self, place_id: &str) -> String {
        format!(
            "{}/place/details/json?place_id={}&fields=formatted_address,geometry&key={}",
            self.base_url,
            urlencoding::encode(place_id),
            urlencoding::encode(&self.api_key)
        )
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Geo(format!("Google Maps request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geo(format!(
                "Google Maps returned status: {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Geo(format!("Failed to read Google Maps response: {}", e)))
    }
}

fn parse_geocode(body: &str) -> Result<GeocodeResponse> {
    let json: GeocodeJson = serde_json::from_str(body)
        .map_err(|e| Error::Geo(format!("Failed to parse geocode response: {}", e)))?;

    Ok(GeocodeResponse {
        status: json.status,
        results: json
            .results
            .into_iter()
            .map(|r| GeocodeResult {
                formatted_address: r.formatted_address,
                location: r.geometry.location.into(),
            })
            .collect(),
    })
}

fn parse_directions(body: &str) -> Result<DirectionsResponse> {
    let json: DirectionsJson = serde_json::from_str(body)
        .map_err(|e| Error::Geo(format!("Failed to parse directions response: {}", e)))?;

    Ok(DirectionsResponse {
        status: json.status,
        routes: json
            .routes
            .into_iter()
            .map(|route| Route {
                legs: route
                    .legs
                    .into_iter()
                    .map(|leg| RouteLeg {
                        start_location: leg.start_location.into(),
                        end_location: leg.end_location.into(),
                    })
                    .collect(),
            })
            .collect(),
    })
}

fn parse_autocomplete(body: &str) -> Result<Vec<PlaceSuggestion>> {
    let json: AutocompleteJson = serde_json::from_str(body)
        .map_err(|e| Error::Geo(format!("Failed to parse autocomplete response: {}", e)))?;

    match json.status.as_str() {
        PROVIDER_OK => Ok(json
            .predictions
            .into_iter()
            .map(|p| PlaceSuggestion {
                place_id: p.place_id,
                description: p.description,
            })
            .collect()),
        "ZERO_RESULTS" => Ok(Vec::new()),
        status => Err(Error::Geo(format!(
            "Autocomplete failed with status {}{}",
            status,
            json.error_message.map(|m| format!(": {}", m)).unwrap_or_default()
        ))),
    }
}

fn parse_details(body: &str) -> Result<Option<PlaceDescriptor>> {
    let json: DetailsJson = serde_json::from_str(body)
        .map_err(|e| Error::Geo(format!("Failed to parse place details response: {}", e)))?;

    match json.status.as_str() {
        PROVIDER_OK => Ok(json.result.map(|r| PlaceDescriptor {
            formatted_address: r.formatted_address,
            anchor: r.geometry.map(|g| g.location.into()),
        })),
        "NOT_FOUND" | "ZERO_RESULTS" => Ok(None),
        status => Err(Error::Geo(format!(
            "Place details failed with status {}{}",
            status,
            json.error_message.map(|m| format!(": {}", m)).unwrap_or_default()
        ))),
    }
}

impl Geocoder for GoogleMapsClient {
    async fn reverse_geocode(&self, at: Coordinates) -> Result<GeocodeResponse> {
        debug!(%at, "reverse geocoding");
        let body = self.fetch(&self.reverse_geocode_url(at)).await?;
        parse_geocode(&body)
    }
}

impl DirectionsProvider for GoogleMapsClient {
    async fn route(&self, request: RouteRequest) -> Result<DirectionsResponse> {
        debug!(origin = %request.origin, destination = %request.destination, "requesting route");
        let body = self.fetch(&self.directions_url(&request)).await?;
        parse_directions(&body)
    }
}

impl PlaceSearch for GoogleMapsClient {
    async fn autocomplete(
        &self,
        input: &str,
        options: &AutocompleteOptions,
    ) -> Result<Vec<PlaceSuggestion>> {
        let body = self.fetch(&self.autocomplete_url(input, options)).await?;
        parse_autocomplete(&body)
    }

    async fn place_details(&self, place_id: &str) -> Result<Option<PlaceDescriptor>> {
        let body = self.fetch(&self.details_url(place_id)).await?;
        parse_details(&body)
    }
}

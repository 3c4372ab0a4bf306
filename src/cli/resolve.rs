//! Resolve command handler
//!
//! One-shot resolution of a coordinate or an address, printed as JSON.

use crate::cli::init_logging;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::google::GoogleMapsClient;
use crate::geo::{AddressResolver, AutocompleteOptions, Coordinates, PlaceDescriptor, PlaceSearch};
use clap::Args;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Resolve command arguments
#[derive(Args)]
pub struct ResolveArgs {
    /// Latitude of a map click
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude of a map click
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Free-text address (first autocomplete suggestion is used)
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    pub address: Option<String>,
}

/// Run the resolve command
pub async fn run(args: ResolveArgs) -> Result<()> {
    init_logging("warn");

    let config = Config::load()?;
    let client = Arc::new(GoogleMapsClient::new(&config.maps)?);
    let resolver = AddressResolver::new(
        client.clone(),
        client.clone(),
        config.maps.origin(),
        config.maps.resolve_timeout(),
    );
    let cancel = CancellationToken::new();

    let resolved = if let Some(query) = &args.address {
        let place = first_place(client.as_ref(), query, &config.maps.autocomplete_options())
            .await?
            .ok_or_else(|| Error::Geo(format!("No address matches '{}'", query)))?;
        eprintln!("Using suggestion: {}", place.formatted_address);
        resolver.resolve_from_selection(&place, &cancel).await
    } else if let (Some(lat), Some(lng)) = (args.lat, args.lng) {
        let at = Coordinates::new(lat, lng);
        at.validate()?;
        resolver.resolve_from_coordinate(at, &cancel).await
    } else {
        return Err(Error::Validation(
            "Provide either --lat/--lng or --address".to_string(),
        ));
    };

    let resolved = resolved.map_err(|e| Error::Geo(format!("{} [{}]", e, e.code())))?;
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}

/// Details of the most relevant suggestion for `query`
pub async fn first_place<P: PlaceSearch>(
    places: &P,
    query: &str,
    options: &AutocompleteOptions,
) -> Result<Option<PlaceDescriptor>> {
    let suggestions = places.autocomplete(query, options).await?;
    match suggestions.first() {
        Some(best) => places.place_details(&best.place_id).await,
        None => Ok(None),
    }
}

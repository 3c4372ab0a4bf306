//! Server shared state
//!
//! Holds configuration and the address resolver shared by all handlers.

use crate::config::Config;
use crate::error::Result;
use crate::geo::google::GoogleMapsClient;
use crate::geo::AddressResolver;
use std::sync::Arc;

/// Resolver backed by one Google Maps client for both stages
pub type GoogleResolver = AddressResolver<Arc<GoogleMapsClient>, Arc<GoogleMapsClient>>;

/// Shared state for the HTTP server
pub struct AppState<G, D> {
    /// Configuration
    pub config: Config,

    /// Address resolver
    pub resolver: Arc<AddressResolver<G, D>>,
}

impl<G, D> AppState<G, D> {
    pub fn new(config: Config, resolver: Arc<AddressResolver<G, D>>) -> Self {
        Self { config, resolver }
    }
}

impl AppState<Arc<GoogleMapsClient>, Arc<GoogleMapsClient>> {
    /// State wired to the configured Google Maps web services
    pub fn from_config(config: Config) -> Result<Self> {
        let client = Arc::new(GoogleMapsClient::new(&config.maps)?);
        let resolver: GoogleResolver = AddressResolver::new(
            client.clone(),
            client,
            config.maps.origin(),
            config.maps.resolve_timeout(),
        );
        Ok(Self::new(config, Arc::new(resolver)))
    }
}

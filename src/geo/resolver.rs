//! Address resolution
//!
//! Turns a picked place or a clicked coordinate into a [`ResolvedLocation`]
//! whose coordinates are the endpoint of a driving route from a fixed
//! origin. The provider's own geometry is only ever used as the route
//! destination.
//!
//! Resolution is a two-stage task (reverse geocode, then route) with a
//! cancellation token threaded through both stages and a timeout on each.

use crate::error::{ResolveError, ResolveStage};
use crate::geo::{
    Coordinates, DirectionsProvider, Geocoder, PlaceDescriptor, ResolvedLocation, RouteRequest,
    TravelMode,
};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Resolves addresses against a geocoder and a routing provider
#[derive(Debug)]
pub struct AddressResolver<G, D> {
    geocoder: G,
    directions: D,
    origin: Coordinates,
    stage_timeout: Duration,
}

impl<G, D> AddressResolver<G, D>
where
    G: Geocoder,
    D: DirectionsProvider,
{
    pub fn new(geocoder: G, directions: D, origin: Coordinates, stage_timeout: Duration) -> Self {
        Self {
            geocoder,
            directions,
            origin,
            stage_timeout,
        }
    }

    /// Route origin every stored location is measured from
    pub fn origin(&self) -> Coordinates {
        self.origin
    }

    /// Resolve an autocomplete selection
    ///
    /// The stored coordinate is the route's leg endpoint, not the place's
    /// geometry anchor.
    pub async fn resolve_from_selection(
        &self,
        place: &PlaceDescriptor,
        cancel: &CancellationToken,
    ) -> Result<ResolvedLocation, ResolveError> {
        let anchor = place.anchor.ok_or_else(|| {
            ResolveError::AddressNotFound(format!(
                "'{}' has no geometry",
                place.formatted_address
            ))
        })?;

        let coordinates = self.route_to(anchor, cancel).await?;

        Ok(ResolvedLocation {
            formatted_address: place.formatted_address.clone(),
            coordinates,
        })
    }

    /// Resolve a clicked map coordinate
    ///
    /// Reverse geocodes first; the route is only requested once that
    /// succeeds. The address is the reverse-geocoded one, the coordinate the
    /// route's leg endpoint.
    pub async fn resolve_from_coordinate(
        &self,
        at: Coordinates,
        cancel: &CancellationToken,
    ) -> Result<ResolvedLocation, ResolveError> {
        let response = self
            .stage(ResolveStage::Geocode, cancel, self.geocoder.reverse_geocode(at))
            .await?
            .map_err(|e| {
                warn!(%at, error = %e, "reverse geocode request failed");
                ResolveError::AddressNotFound(e.to_string())
            })?;

        let hit = response.first().cloned().ok_or_else(|| {
            debug!(%at, status = %response.status, "reverse geocode returned no address");
            ResolveError::AddressNotFound(format!("geocoder status {}", response.status))
        })?;

        let coordinates = self.route_to(hit.location, cancel).await?;

        Ok(ResolvedLocation {
            formatted_address: hit.formatted_address,
            coordinates,
        })
    }

    /// Compute the driving route from the origin and return its leg endpoint
    async fn route_to(
        &self,
        destination: Coordinates,
        cancel: &CancellationToken,
    ) -> Result<Coordinates, ResolveError> {
        let request = RouteRequest {
            origin: self.origin,
            destination,
            mode: TravelMode::Driving,
        };

        let response = self
            .stage(ResolveStage::Route, cancel, self.directions.route(request))
            .await?
            .map_err(|e| {
                warn!(%destination, error = %e, "route request failed");
                ResolveError::RouteUnavailable(e.to_string())
            })?;

        response.leg_endpoint().ok_or_else(|| {
            debug!(%destination, status = %response.status, "no usable route");
            ResolveError::RouteUnavailable(format!("routing status {}", response.status))
        })
    }

    /// Run one provider call, bounded by the stage timeout and the token
    async fn stage<T>(
        &self,
        stage: ResolveStage,
        cancel: &CancellationToken,
        call: impl Future<Output = T>,
    ) -> Result<T, ResolveError> {
        if cancel.is_cancelled() {
            return Err(ResolveError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ResolveError::Cancelled),
            outcome = tokio::time::timeout(self.stage_timeout, call) => {
                outcome.map_err(|_| ResolveError::TimedOut { stage })
            }
        }
    }
}

//! HTTP API routes
//!
//! Address resolution over JSON. Each request resolves independently with
//! its own cancellation token; the per-stage timeout still applies.

use crate::error::{Error, ResolveError};
use crate::geo::{Coordinates, DirectionsProvider, Geocoder, PlaceDescriptor, ResolvedLocation};
use crate::server::state::AppState;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Create the API router
pub fn create_router<G, D>(state: Arc<AppState<G, D>>) -> Router
where
    G: Geocoder + 'static,
    D: DirectionsProvider + 'static,
{
    Router::new()
        .route("/api/status", get(status_handler::<G, D>))
        .route("/api/resolve/coordinate", post(resolve_coordinate_handler::<G, D>))
        .route("/api/resolve/place", post(resolve_place_handler::<G, D>))
        .with_state(state)
}

/// Map click request body
#[derive(Debug, Deserialize)]
pub struct CoordinateRequest {
    pub lat: f64,
    pub lng: f64,
}

/// Place selection request body
#[derive(Debug, Deserialize)]
pub struct PlaceRequest {
    pub formatted_address: String,
    /// Geometry anchor; both or neither
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let (status, code) = match &err {
            Error::InvalidCoordinates(_) => (StatusCode::BAD_REQUEST, "INVALID_COORDINATES"),
            Error::Validation(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        ApiError {
            status,
            error: err.to_string(),
            code: code.to_string(),
        }
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        let status = match err {
            ResolveError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        ApiError {
            status,
            error: err.to_string(),
            code: err.code().to_string(),
        }
    }
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
    pub version: String,
    pub origin: Coordinates,
    pub resolve_timeout_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler<G, D>(State(state): State<Arc<AppState<G, D>>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        origin: state.config.maps.origin(),
        resolve_timeout_secs: state.config.maps.resolve_timeout_secs,
    })
}

/// Resolve a clicked coordinate
///
/// POST /api/resolve/coordinate
async fn resolve_coordinate_handler<G, D>(
    State(state): State<Arc<AppState<G, D>>>,
    Json(req): Json<CoordinateRequest>,
) -> Result<Json<ResolvedLocation>, ApiError>
where
    G: Geocoder,
    D: DirectionsProvider,
{
    let at = Coordinates::new(req.lat, req.lng);
    at.validate()?;

    debug!(%at, "resolving coordinate");
    let resolved = state
        .resolver
        .resolve_from_coordinate(at, &CancellationToken::new())
        .await
        .map_err(|e| {
            warn!(%at, error = %e, "coordinate resolution failed");
            ApiError::from(e)
        })?;

    Ok(Json(resolved))
}

/// Resolve a picked place
///
/// POST /api/resolve/place
async fn resolve_place_handler<G, D>(
    State(state): State<Arc<AppState<G, D>>>,
    Json(req): Json<PlaceRequest>,
) -> Result<Json<ResolvedLocation>, ApiError>
where
    G: Geocoder,
    D: DirectionsProvider,
{
    let anchor = match (req.lat, req.lng) {
        (Some(lat), Some(lng)) => {
            let anchor = Coordinates::new(lat, lng);
            anchor.validate()?;
            Some(anchor)
        }
        (None, None) => None,
        _ => {
            return Err(Error::Validation("lat and lng must be given together".to_string()).into())
        }
    };

    let place = PlaceDescriptor {
        formatted_address: req.formatted_address,
        anchor,
    };

    debug!(address = %place.formatted_address, "resolving place");
    let resolved = state
        .resolver
        .resolve_from_selection(&place, &CancellationToken::new())
        .await
        .map_err(|e| {
            warn!(address = %place.formatted_address, error = %e, "place resolution failed");
            ApiError::from(e)
        })?;

    Ok(Json(resolved))
}

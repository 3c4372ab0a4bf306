//! Error types for client-intake

use thiserror::Error;

/// Main error type for client-intake operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Geo error: {0}")]
    Geo(String),

    #[error("Prompt error: {0}")]
    Prompt(String),
}

/// Result type alias for client-intake operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which provider call a resolution was waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStage {
    Geocode,
    Route,
}

impl std::fmt::Display for ResolveStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Geocode => write!(f, "geocode"),
            Self::Route => write!(f, "route"),
        }
    }
}

/// Failure of a single address resolution
///
/// None of these are fatal. `Cancelled` means the request was superseded or
/// the screen was torn down and is never shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("address not found: {0}")]
    AddressNotFound(String),

    #[error("route unavailable: {0}")]
    RouteUnavailable(String),

    #[error("{stage} request timed out")]
    TimedOut { stage: ResolveStage },

    #[error("resolution cancelled")]
    Cancelled,
}

impl ResolveError {
    /// Stable code used by the HTTP API and logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::AddressNotFound(_) => "ADDRESS_NOT_FOUND",
            Self::RouteUnavailable(_) => "ROUTE_UNAVAILABLE",
            Self::TimedOut { .. } => "TIMED_OUT",
            Self::Cancelled => "CANCELLED",
        }
    }
}

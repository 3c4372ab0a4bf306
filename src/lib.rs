//! client-intake: customer registration with route-validated addresses
//!
//! A library and CLI for the customer intake screen: a draft record,
//! field validation and submission against a backend, and an address
//! picker whose stored coordinate is always the endpoint of a driving
//! route from a fixed origin.
//!
//! ## Features
//!
//! - Address resolution from autocomplete selections or map clicks
//! - Supersession of stale resolutions and per-stage timeouts
//! - Unsaved-changes guard for unload and in-page navigation
//! - Screen-scoped cancellation of every pending call
//! - HTTP API + interactive CLI
//!
//! ## Quick Start
//!
//! ```no_run
//! use client_intake::config::Config;
//! use client_intake::geo::google::GoogleMapsClient;
//! use client_intake::geo::{AddressResolver, Coordinates};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> client_intake::Result<()> {
//! let config = Config::load()?;
//! let client = Arc::new(GoogleMapsClient::new(&config.maps)?);
//! let resolver = AddressResolver::new(
//!     client.clone(),
//!     client,
//!     config.maps.origin(),
//!     config.maps.resolve_timeout(),
//! );
//!
//! let clicked = Coordinates::new(6.3000, -75.5700);
//! match resolver.resolve_from_coordinate(clicked, &CancellationToken::new()).await {
//!     Ok(location) => println!("{} at {}", location.formatted_address, location.coordinates),
//!     Err(e) => eprintln!("{} [{}]", e, e.code()),
//! }
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod form;
pub mod geo;
pub mod guard;
pub mod lifecycle;
pub mod map;
pub mod screen;
pub mod server;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, ResolveError, Result};
pub use form::{CustomerDraft, FormModel};
pub use geo::{AddressResolver, Coordinates, ResolvedLocation};
pub use screen::IntakeScreen;

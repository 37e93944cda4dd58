//! route-planner: place resolution and driving routes
//!
//! A library and CLI tool that turns free-text place names into coordinates
//! and computes a driving route through them, by orchestrating Photon,
//! Nominatim and OSRM.
//!
//! ## Features
//!
//! - Literal `lat,lng` queries resolved without any outbound call
//! - Parallel fast lookups (Photon) with a rate-limited sequential
//!   fallback (Nominatim)
//! - All-or-nothing batches: every query resolves or the request fails
//! - Optional Israel region bias
//! - Ordered multi-stop routing via OSRM
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use route_planner::config::Config;
//! use route_planner::geo::Region;
//! use route_planner::resolve::HttpResolver;
//! use route_planner::route::HttpRoutePlanner;
//!
//! # async fn demo() -> route_planner::Result<()> {
//! let config = Config::default();
//! let resolver = HttpResolver::from_config(&config)?;
//! let places = resolver
//!     .resolve(&["Tel Aviv".to_string(), "31.7683,35.2137".to_string()], Region::Israel)
//!     .await?;
//!
//! let points: Vec<_> = places
//!     .iter()
//!     .map(|p| route_planner::Coordinates::new(p.lat, p.lng))
//!     .collect();
//! let route = HttpRoutePlanner::from_config(&config)?.plan(&points).await?;
//! println!("{:.1} km", route.distance_m / 1000.0);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod geo;
pub mod resolve;
pub mod route;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use geo::{Coordinates, Provider, Region};
pub use resolve::ResolvedPlace;
pub use route::RouteResult;

//! Server shared state
//!
//! Holds configuration and the provider-backed services. Everything here is
//! read-only after startup; no request can observe another.

use crate::config::Config;
use crate::error::Result;
use crate::resolve::HttpResolver;
use crate::route::HttpRoutePlanner;

/// Shared state for the HTTP server
#[derive(Debug)]
pub struct AppState {
    /// Configuration
    pub config: Config,

    /// Place resolver (Photon, then Nominatim)
    pub resolver: HttpResolver,

    /// Route computer (OSRM)
    pub planner: HttpRoutePlanner,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Result<Self> {
        let resolver = HttpResolver::from_config(&config)?;
        let planner = HttpRoutePlanner::from_config(&config)?;
        Ok(Self {
            config,
            resolver,
            planner,
        })
    }
}

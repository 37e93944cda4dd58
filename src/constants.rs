//! Centralized constants for the route-planner crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Latitude bounds in degrees
    pub const MIN_LAT: f64 = -90.0;
    pub const MAX_LAT: f64 = 90.0;

    /// Longitude bounds in degrees
    pub const MIN_LNG: f64 = -180.0;
    pub const MAX_LNG: f64 = 180.0;

    /// Point the fast provider is biased toward for the Israel region
    pub const ISRAEL_CENTER: (f64, f64) = (31.5, 34.8);

    /// Rough Israel bounding box: west, south, east, north
    pub const ISRAEL_BBOX: (f64, f64, f64, f64) = (34.2, 29.4, 35.95, 33.4);

    /// ISO 3166-1 country code for the Israel region
    pub const ISRAEL_COUNTRY_CODE: &str = "il";
}

/// External API endpoints
pub mod api {
    /// Photon geocoding API (fast provider)
    pub const PHOTON_URL: &str = "https://photon.komoot.io";

    /// OpenStreetMap Nominatim geocoding API (fallback provider)
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// Public OSRM demo server
    pub const OSRM_URL: &str = "https://router.project-osrm.org";
}

/// Request limits enforced by the HTTP surface and the CLI
pub mod limits {
    /// Maximum number of queries in a single resolve batch
    pub const MAX_QUERIES: usize = 20;

    /// Minimum number of waypoints for a route
    pub const MIN_ROUTE_POINTS: usize = 2;

    /// Maximum number of waypoints for a route
    pub const MAX_ROUTE_POINTS: usize = 25;
}

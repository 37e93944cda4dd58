//! Route computation
//!
//! Validates an ordered list of waypoints and asks the routing provider for
//! the best route through them in that order.

pub mod osrm;

use crate::config::Config;
use crate::constants::limits::{MAX_ROUTE_POINTS, MIN_ROUTE_POINTS};
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Best route returned by the routing provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Total length in meters
    pub distance_m: f64,
    /// Total travel time in seconds
    pub duration_s: f64,
    /// Path geometry exactly as the provider sent it (GeoJSON LineString)
    pub geometry: Option<Value>,
}

/// Trait for routing backends
pub trait RouteBackend: Send + Sync {
    /// Route through `points` in order and return the best-ranked candidate
    fn route(
        &self,
        points: &[Coordinates],
    ) -> impl std::future::Future<Output = Result<RouteResult>> + Send;
}

/// Route computer over a routing backend
#[derive(Debug)]
pub struct RoutePlanner<R> {
    backend: R,
}

/// The route computer wired to OSRM
pub type HttpRoutePlanner = RoutePlanner<osrm::OsrmBackend>;

impl HttpRoutePlanner {
    /// Build the OSRM backend from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(osrm::OsrmBackend::new(
            &config.providers,
            &config.route.profile,
        )?))
    }
}

impl<R: RouteBackend> RoutePlanner<R> {
    pub fn new(backend: R) -> Self {
        Self { backend }
    }

    /// Compute the route through `points` in the given order
    pub async fn plan(&self, points: &[Coordinates]) -> Result<RouteResult> {
        check_point_count(points.len())?;
        if !points.iter().all(Coordinates::is_valid) {
            return Err(Error::Validation("Invalid points".to_string()));
        }

        info!(points = points.len(), "computing route");
        let route = self.backend.route(points).await?;
        info!(
            distance_m = route.distance_m,
            duration_s = route.duration_s,
            "route computed"
        );
        Ok(route)
    }
}

/// Reject routes with too few or too many waypoints
pub fn check_point_count(len: usize) -> Result<()> {
    if len < MIN_ROUTE_POINTS {
        return Err(Error::Validation(format!(
            "Need at least {} points",
            MIN_ROUTE_POINTS
        )));
    }
    if len > MAX_ROUTE_POINTS {
        return Err(Error::Validation(format!("Max {} points", MAX_ROUTE_POINTS)));
    }
    Ok(())
}

/// Read a waypoint from request JSON
///
/// `lat` and `lng` must both be JSON numbers inside the valid ranges.
pub fn point_from_json(value: &Value) -> Option<Coordinates> {
    let lat = value.get("lat")?.as_f64()?;
    let lng = value.get("lng")?.as_f64()?;
    let coords = Coordinates::new(lat, lng);
    coords.is_valid().then_some(coords)
}

/// Provider coordinate sequence: `lng,lat` pairs joined by `;`, in order
pub fn coordinate_path(points: &[Coordinates]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.lng, p.lat))
        .collect::<Vec<_>>()
        .join(";")
}

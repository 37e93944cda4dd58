//! OSRM routing backend
//!
//! Calls the OSRM `route` service with full GeoJSON geometry and keeps the
//! first (best-ranked) route.

use crate::client::build_client;
use crate::config::ProvidersConfig;
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use crate::route::{coordinate_path, RouteBackend, RouteResult};
use serde_json::Value;
use tracing::debug;

/// OSRM routing backend
#[derive(Debug, Clone)]
pub struct OsrmBackend {
    client: reqwest::Client,
    base_url: String,
    profile: String,
}

impl OsrmBackend {
    /// Create a new OSRM backend for a routing profile (e.g. "driving")
    pub fn new(providers: &ProvidersConfig, profile: &str) -> Result<Self> {
        Ok(Self {
            client: build_client(providers)?,
            base_url: providers.osrm_url.trim_end_matches('/').to_string(),
            profile: profile.to_string(),
        })
    }

    /// Route URL for an ordered list of waypoints
    pub fn route_url(&self, points: &[Coordinates]) -> String {
        format!(
            "{}/route/v1/{}/{}?overview=full&geometries=geojson",
            self.base_url,
            self.profile,
            coordinate_path(points)
        )
    }

    /// Take the first route from a response body
    ///
    /// Missing distance or duration count as 0, missing geometry as null.
    fn parse_response(body: &str) -> Result<RouteResult> {
        let missing = || Error::Upstream("OSRM route missing routes".to_string());

        let data: Value = serde_json::from_str(body).map_err(|_| missing())?;
        let route = data
            .get("routes")
            .and_then(Value::as_array)
            .and_then(|routes| routes.first())
            .ok_or_else(missing)?;

        let number = |key: &str| route.get(key).and_then(Value::as_f64).unwrap_or(0.0);

        Ok(RouteResult {
            distance_m: number("distance"),
            duration_s: number("duration"),
            geometry: route.get("geometry").filter(|g| !g.is_null()).cloned(),
        })
    }
}

impl RouteBackend for OsrmBackend {
    async fn route(&self, points: &[Coordinates]) -> Result<RouteResult> {
        let url = self.route_url(points);
        debug!(%url, "osrm route");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("OSRM route request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream(format!(
                "OSRM route HTTP {}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Upstream(format!("OSRM route body unreadable: {}", e)))?;

        Self::parse_response(&body)
    }
}

//! Photon geocoding backend (komoot)
//!
//! Fast OSM-based geocoder with no strict rate limit, so every query in a
//! batch can hit it at once. Accepts a `lat`/`lon` pair to rank results
//! around a point.

use crate::client::build_client;
use crate::config::ProvidersConfig;
use crate::error::{Error, Result};
use crate::geo::{checked_location, lenient_f64, GeoLocation, Geocoder, Provider, Region};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Photon geocoding backend
#[derive(Debug, Clone)]
pub struct PhotonBackend {
    client: reqwest::Client,
    base_url: String,
}

/// Photon GeoJSON response
#[derive(Debug, Deserialize)]
struct PhotonResponse {
    #[serde(default)]
    features: Vec<PhotonFeature>,
}

#[derive(Debug, Deserialize)]
struct PhotonFeature {
    geometry: Option<PhotonGeometry>,
    /// Absent or null both read as no properties
    #[serde(default)]
    properties: Option<PhotonProperties>,
}

#[derive(Debug, Deserialize)]
struct PhotonGeometry {
    #[serde(default)]
    coordinates: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct PhotonProperties {
    name: Option<String>,
    street: Option<String>,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl PhotonBackend {
    /// Create a new Photon backend from provider settings
    pub fn new(providers: &ProvidersConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(providers)?,
            base_url: providers.photon_url.trim_end_matches('/').to_string(),
        })
    }

    /// Search URL for a single query
    pub fn search_url(&self, query: &str, region: Region) -> String {
        let bias = region
            .bias_point()
            .map(|c| format!("&lat={}&lon={}", c.lat, c.lng))
            .unwrap_or_default();

        format!(
            "{}/api/?limit=1{}&q={}",
            self.base_url,
            bias,
            urlencoding::encode(query)
        )
    }

    /// Extract the first usable feature from a response body
    ///
    /// Invalid JSON and JSON without the expected fields both yield None.
    fn parse_response(body: &str, query: &str) -> Option<GeoLocation> {
        let response: PhotonResponse = serde_json::from_str(body).ok()?;
        let feature = response.features.into_iter().next()?;
        let coordinates = feature.geometry?.coordinates;

        // GeoJSON order is [lng, lat]
        let lng = lenient_f64(coordinates.first()?)?;
        let lat = lenient_f64(coordinates.get(1)?)?;

        let props = feature.properties.unwrap_or_default();
        checked_location(lat, lng, Self::label(&props, query))
    }

    /// Human-readable label: name, then city if different, then country
    fn label(props: &PhotonProperties, query: &str) -> String {
        let name = present(&props.name)
            .or_else(|| present(&props.street))
            .or_else(|| present(&props.city))
            .or_else(|| present(&props.state))
            .unwrap_or(query);

        let mut parts = vec![name];
        if let Some(city) = present(&props.city) {
            if city != name {
                parts.push(city);
            }
        }
        if let Some(country) = present(&props.country) {
            parts.push(country);
        }

        parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A property counts only when it is non-empty
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

impl Geocoder for PhotonBackend {
    fn provider(&self) -> Provider {
        Provider::Photon
    }

    async fn geocode(&self, query: &str, region: Region) -> Result<Option<GeoLocation>> {
        let url = self.search_url(query, region);
        debug!(%query, %region, "photon lookup");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Photon request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream(format!("Photon HTTP {}", status.as_u16())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Upstream(format!("Photon body unreadable: {}", e)))?;

        Ok(Self::parse_response(&body, query))
    }
}

//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Uses the free Nominatim API as the fallback geocoder.
//! Rate limit: 1 request per second, and a User-Agent identifying the
//! application is mandatory.

use crate::client::build_client;
use crate::config::ProvidersConfig;
use crate::error::{Error, Result};
use crate::geo::{checked_location, lenient_f64, GeoLocation, Geocoder, Provider, Region};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    base_url: String,
    language: String,
}

/// Nominatim search response item
#[derive(Debug, Deserialize)]
struct NominatimResult {
    #[serde(default)]
    lat: Value,
    #[serde(default)]
    lon: Value,
    display_name: Option<String>,
}

impl NominatimBackend {
    /// Create a new Nominatim backend
    ///
    /// `language` is sent as `accept-language` and controls the labels.
    pub fn new(providers: &ProvidersConfig, language: &str) -> Result<Self> {
        Ok(Self {
            client: build_client(providers)?,
            base_url: providers.nominatim_url.trim_end_matches('/').to_string(),
            language: language.to_string(),
        })
    }

    /// Search URL for a single query
    ///
    /// The Israel region restricts results by country code and bounds them to
    /// a fixed box; other regions add no restriction.
    pub fn search_url(&self, query: &str, region: Region) -> String {
        let mut url = format!(
            "{}/search?format=json&limit=1&accept-language={}",
            self.base_url,
            urlencoding::encode(&self.language)
        );

        if let Some(code) = region.country_code() {
            url.push_str(&format!("&countrycodes={}", code));
        }
        if let Some(bbox) = region.bounding_box() {
            url.push_str(&format!("&viewbox={}&bounded=1", bbox.to_viewbox()));
        }

        url.push_str(&format!("&q={}", urlencoding::encode(query)));
        url
    }

    /// Extract the first usable result from a response body
    fn parse_response(body: &str, query: &str) -> Option<GeoLocation> {
        let results: Vec<NominatimResult> = serde_json::from_str(body).ok()?;
        let result = results.into_iter().next()?;

        let lat = lenient_f64(&result.lat)?;
        let lng = lenient_f64(&result.lon)?;
        let display_name = result
            .display_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| query.to_string());

        checked_location(lat, lng, display_name)
    }
}

impl Geocoder for NominatimBackend {
    fn provider(&self) -> Provider {
        Provider::Nominatim
    }

    async fn geocode(&self, query: &str, region: Region) -> Result<Option<GeoLocation>> {
        let url = self.search_url(query, region);
        debug!(%query, %region, "nominatim lookup");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Nominatim request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream(format!(
                "Nominatim HTTP {}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Upstream(format!("Nominatim body unreadable: {}", e)))?;

        Ok(Self::parse_response(&body, query))
    }
}

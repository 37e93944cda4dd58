//! Geocoding module
//!
//! Shared geographic types plus the three ways a query becomes a coordinate:
//! literal `lat,lng` parsing, Photon (fast) and Nominatim (fallback).

pub mod latlng;
pub mod nominatim;
pub mod photon;

use crate::constants::geo::{
    ISRAEL_BBOX, ISRAEL_CENTER, ISRAEL_COUNTRY_CODE, MAX_LAT, MAX_LNG, MIN_LAT, MIN_LNG,
};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when both components are finite and inside the WGS84 ranges
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Validate that coordinates are finite and within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&self.lat) {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !self.lng.is_finite() || !(MIN_LNG..=MAX_LNG).contains(&self.lng) {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

/// Which source produced a resolved place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// The query was already a coordinate pair
    LatLng,
    /// Photon (fast provider)
    Photon,
    /// Nominatim (fallback provider)
    Nominatim,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LatLng => write!(f, "latlng"),
            Self::Photon => write!(f, "photon"),
            Self::Nominatim => write!(f, "nominatim"),
        }
    }
}

/// Bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Nominatim `viewbox` value: `west,south,east,north`
    pub fn to_viewbox(&self) -> String {
        format!("{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}

/// Optional hint narrowing the geocoding search area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Israel: bias the fast provider, restrict the fallback provider
    #[serde(rename = "il")]
    Israel,
    /// No restriction
    #[default]
    Any,
}

impl Region {
    /// Interpret a free-form region hint; anything but `il` means no restriction
    pub fn from_hint(hint: &str) -> Self {
        if hint.trim().eq_ignore_ascii_case("il") {
            Self::Israel
        } else {
            Self::Any
        }
    }

    /// Point the fast provider should rank results around
    pub fn bias_point(self) -> Option<Coordinates> {
        match self {
            Self::Israel => Some(Coordinates::new(ISRAEL_CENTER.0, ISRAEL_CENTER.1)),
            Self::Any => None,
        }
    }

    /// Country code the fallback provider is restricted to
    pub fn country_code(self) -> Option<&'static str> {
        match self {
            Self::Israel => Some(ISRAEL_COUNTRY_CODE),
            Self::Any => None,
        }
    }

    /// Box the fallback provider is bounded to
    pub fn bounding_box(self) -> Option<BoundingBox> {
        match self {
            Self::Israel => Some(BoundingBox {
                west: ISRAEL_BBOX.0,
                south: ISRAEL_BBOX.1,
                east: ISRAEL_BBOX.2,
                north: ISRAEL_BBOX.3,
            }),
            Self::Any => None,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Israel => write!(f, "il"),
            Self::Any => write!(f, "any"),
        }
    }
}

/// A geocoded location result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
    /// Display name (address or description)
    pub display_name: String,
}

/// Trait for geocoding backends
pub trait Geocoder: Send + Sync {
    /// Which provider tag results from this backend carry
    fn provider(&self) -> Provider;

    /// Geocode a location string to coordinates
    ///
    /// `Ok(None)` means the provider answered but had no usable candidate,
    /// including malformed bodies. `Err` means the call itself failed.
    fn geocode(
        &self,
        query: &str,
        region: Region,
    ) -> impl std::future::Future<Output = Result<Option<GeoLocation>>> + Send;
}

/// Read a JSON number that upstreams sometimes send as a string
pub(crate) fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Build a location only if the coordinates are usable
pub(crate) fn checked_location(lat: f64, lng: f64, display_name: String) -> Option<GeoLocation> {
    Coordinates::new(lat, lng)
        .is_valid()
        .then_some(GeoLocation {
            lat,
            lng,
            display_name,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coordinate_ranges() {
        assert!(Coordinates::new(90.0, 180.0).is_valid());
        assert!(Coordinates::new(-90.0, -180.0).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, 181.0).is_valid());
        assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_validate_message() {
        let err = Coordinates::new(91.0, 0.0).validate().unwrap_err();
        assert!(err.to_string().contains("Latitude 91"));
    }

    #[test]
    fn test_provider_serialization() {
        assert_eq!(serde_json::to_string(&Provider::LatLng).unwrap(), "\"latlng\"");
        assert_eq!(serde_json::to_string(&Provider::Photon).unwrap(), "\"photon\"");
        assert_eq!(
            serde_json::to_string(&Provider::Nominatim).unwrap(),
            "\"nominatim\""
        );
    }

    #[test]
    fn test_region_from_hint() {
        assert_eq!(Region::from_hint("il"), Region::Israel);
        assert_eq!(Region::from_hint(" IL "), Region::Israel);
        assert_eq!(Region::from_hint("any"), Region::Any);
        assert_eq!(Region::from_hint(""), Region::Any);
        assert_eq!(Region::from_hint("us"), Region::Any);
    }

    #[test]
    fn test_region_parameters() {
        assert_eq!(Region::Israel.country_code(), Some("il"));
        assert_eq!(
            Region::Israel.bounding_box().unwrap().to_viewbox(),
            "34.2,29.4,35.95,33.4"
        );
        assert_eq!(Region::Israel.bias_point(), Some(Coordinates::new(31.5, 34.8)));

        assert!(Region::Any.country_code().is_none());
        assert!(Region::Any.bounding_box().is_none());
        assert!(Region::Any.bias_point().is_none());
    }

    #[test]
    fn test_lenient_f64() {
        assert_eq!(lenient_f64(&json!(32.1)), Some(32.1));
        assert_eq!(lenient_f64(&json!("34.78")), Some(34.78));
        assert_eq!(lenient_f64(&json!("north")), None);
        assert_eq!(lenient_f64(&json!(null)), None);
    }

    #[test]
    fn test_checked_location_rejects_out_of_range() {
        assert!(checked_location(32.0, 34.0, "ok".to_string()).is_some());
        assert!(checked_location(95.0, 34.0, "bad".to_string()).is_none());
    }
}

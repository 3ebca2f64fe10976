//! Upstream response types for the places text-search and geocoding endpoints.
//!
//! ## Observed shape
//!
//! ### `status`
//! Every response carries a string status. `"OK"` and `"ZERO_RESULTS"` are
//! the only successful values; anything else (`"OVER_QUERY_LIMIT"`,
//! `"REQUEST_DENIED"`, `"INVALID_REQUEST"`, ...) arrives with HTTP 200 and an
//! optional `error_message`, so the HTTP status alone is not enough.
//!
//! ### `next_page_token`
//! Present only when more results exist. The token is not usable until a
//! short while after it is issued; requesting it early yields
//! `"INVALID_REQUEST"`.
//!
//! ### Place records
//! `rating`, `user_ratings_total`, and `geometry` may each be missing.
//! `formatted_address` is nearly always present but is defaulted to an empty
//! string so one odd record cannot fail a whole page.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Formats as `"lat,lng"`, the shape the upstream `location` parameter expects.
    #[must_use]
    pub fn to_query_value(self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Upstream `{lat, lng}` object.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for Coordinate {
    fn from(value: LatLng) -> Self {
        Self::new(value.lat, value.lng)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

/// Top-level response from the text-search endpoint.
#[derive(Debug, Deserialize)]
pub struct TextSearchResponse {
    pub status: String,

    #[serde(default)]
    pub results: Vec<RawPlace>,

    /// Continuation token for the next page.
    #[serde(default)]
    pub next_page_token: Option<String>,

    #[serde(default)]
    pub error_message: Option<String>,
}

impl TextSearchResponse {
    /// `true` for `"OK"` and `"ZERO_RESULTS"`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.status.as_str(), "OK" | "ZERO_RESULTS")
    }
}

/// A single place record as returned by the text-search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlace {
    pub place_id: String,

    pub name: String,

    #[serde(default)]
    pub formatted_address: String,

    /// Average rating on a 1.0-5.0 scale. Missing for unrated places.
    #[serde(default)]
    pub rating: Option<f64>,

    #[serde(default)]
    pub user_ratings_total: Option<u32>,

    #[serde(default)]
    pub geometry: Option<Geometry>,

    /// Category tags such as `"restaurant"` or `"point_of_interest"`.
    #[serde(default)]
    pub types: Vec<String>,

    #[serde(default)]
    pub business_status: Option<String>,
}

impl RawPlace {
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.geometry.as_ref().map(|g| g.location.into())
    }
}

/// Top-level response from the geocoding endpoint.
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,

    #[serde(default)]
    pub results: Vec<GeocodeCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeCandidate {
    pub geometry: Geometry,

    #[serde(default)]
    pub formatted_address: Option<String>,
}

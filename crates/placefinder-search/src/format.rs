//! Normalized output records built from upstream place data.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::distance::haversine_km;
use crate::types::{Coordinate, RawPlace};

/// A place as returned to callers.
///
/// `distance_km` holds the unrounded distance; serialization rounds it to
/// two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedPlace {
    pub name: String,
    pub address: String,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub place_id: String,
    pub maps_embed_url: String,
    pub maps_direction_url: String,
    #[serde(serialize_with = "serialize_rounded_km")]
    pub distance_km: Option<f64>,
    pub types: Vec<String>,
}

/// Builds map links for formatted places.
#[derive(Debug, Clone, Default)]
pub struct MapsLinks {
    embed_api_key: Option<String>,
}

impl MapsLinks {
    #[must_use]
    pub fn new(embed_api_key: Option<String>) -> Self {
        Self { embed_api_key }
    }

    /// Embeddable map view centred on the place.
    #[must_use]
    pub fn embed_url(&self, place_id: &str) -> String {
        let place = utf8_percent_encode(place_id, NON_ALPHANUMERIC);
        match &self.embed_api_key {
            Some(key) => format!(
                "https://www.google.com/maps/embed/v1/place?key={}&q=place_id:{place}",
                utf8_percent_encode(key, NON_ALPHANUMERIC)
            ),
            None => format!("https://www.google.com/maps?q=place_id:{place}&output=embed"),
        }
    }

    /// Directions link to the place's address.
    #[must_use]
    pub fn directions_url(&self, address: &str, place_id: &str) -> String {
        format!(
            "https://www.google.com/maps/dir/?api=1&destination={}&destination_place_id={}",
            utf8_percent_encode(address, NON_ALPHANUMERIC),
            utf8_percent_encode(place_id, NON_ALPHANUMERIC)
        )
    }
}

/// Maps an upstream record into its output shape.
///
/// `distance_km` is set only when both `anchor` and the place's coordinate
/// are known.
#[must_use]
pub fn format_place(raw: RawPlace, anchor: Option<Coordinate>, links: &MapsLinks) -> FormattedPlace {
    let distance_km = anchor
        .zip(raw.coordinate())
        .map(|(from, to)| haversine_km(from, to));

    FormattedPlace {
        maps_embed_url: links.embed_url(&raw.place_id),
        maps_direction_url: links.directions_url(&raw.formatted_address, &raw.place_id),
        name: raw.name,
        address: raw.formatted_address,
        rating: raw.rating,
        user_ratings_total: raw.user_ratings_total,
        place_id: raw.place_id,
        distance_km,
        types: raw.types,
    }
}

#[allow(clippy::ref_option)]
fn serialize_rounded_km<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(km) => serializer.serialize_some(&((km * 100.0).round() / 100.0)),
        None => serializer.serialize_none(),
    }
}

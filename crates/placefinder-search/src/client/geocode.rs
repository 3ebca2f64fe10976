//! Anchor resolution through the upstream geocoding endpoint.

use crate::error::SearchError;
use crate::types::{Coordinate, GeocodeResponse};

use super::endpoint::GEOCODE_PATH;
use super::PlacesClient;

impl PlacesClient {
    /// Resolves a free-text location to the coordinate of its first candidate.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Geocode`] if the upstream status is not `"OK"` or
    ///   no candidates are returned.
    /// - Any transport error from the underlying request.
    pub async fn geocode(&self, location: &str) -> Result<Coordinate, SearchError> {
        let mut url = self.geocode_url.clone();
        url.query_pairs_mut()
            .append_pair("address", location)
            .append_pair("key", &self.api_key);

        let response: GeocodeResponse = self.get_json(url, GEOCODE_PATH).await?;

        if response.status != "OK" {
            return Err(SearchError::Geocode {
                location: location.to_owned(),
                reason: format!("upstream status {}", response.status),
            });
        }

        let candidate = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| SearchError::Geocode {
                location: location.to_owned(),
                reason: "no candidates returned".to_owned(),
            })?;

        let coordinate = Coordinate::from(candidate.geometry.location);
        tracing::debug!(
            location,
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            matched = candidate.formatted_address.as_deref().unwrap_or(""),
            "resolved anchor location"
        );
        Ok(coordinate)
    }
}

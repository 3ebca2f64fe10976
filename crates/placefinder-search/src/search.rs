//! Search aggregation: anchor resolution, multi-page fetch, formatting,
//! ranking, and pagination for one call.

use std::time::Duration;

use placefinder_core::{AnchorSetting, AppConfig};
use serde::Serialize;
use tokio::time::Instant;

use crate::client::{FetchLimits, PlacesClient, StopReason};
use crate::error::SearchError;
use crate::format::{format_place, FormattedPlace, MapsLinks};
use crate::pagination::{page_bounds, validate_page_request, PaginationInfo};
use crate::rank::rank_places;
use crate::types::Coordinate;

/// Where the anchor for distance ranking comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Anchor {
    None,
    /// Geocoded once per search call.
    Location(String),
    Coordinate(Coordinate),
}

impl From<&AnchorSetting> for Anchor {
    fn from(setting: &AnchorSetting) -> Self {
        match setting {
            AnchorSetting::None => Self::None,
            AnchorSetting::Location(text) => Self::Location(text.clone()),
            AnchorSetting::Coordinate {
                latitude,
                longitude,
            } => Self::Coordinate(Coordinate::new(*latitude, *longitude)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub anchor: Anchor,
    pub limits: FetchLimits,
    /// Upper bound on one whole `search` call.
    pub search_timeout: Duration,
    pub links: MapsLinks,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            anchor: Anchor::None,
            limits: FetchLimits::default(),
            search_timeout: Duration::from_secs(30),
            links: MapsLinks::default(),
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            anchor: Anchor::from(&config.anchor),
            limits: FetchLimits {
                page_token_delay: Duration::from_millis(config.page_token_delay_ms),
                radius_m: config.search_radius_m,
                ..FetchLimits::default()
            },
            search_timeout: Duration::from_secs(config.search_timeout_secs),
            links: MapsLinks::new(config.maps_embed_api_key.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchStatus {
    Ok,
    ZeroResults,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub status: SearchStatus,
    pub results: Vec<FormattedPlace>,
    pub pagination: PaginationInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_location: Option<Coordinate>,
}

/// The search engine. Cheap to share behind an `Arc`; every call is
/// independent.
pub struct PlaceSearch {
    client: PlacesClient,
    config: SearchConfig,
}

impl PlaceSearch {
    #[must_use]
    pub fn new(client: PlacesClient, config: SearchConfig) -> Self {
        Self { client, config }
    }

    /// Builds the upstream client and search settings from `AppConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] or [`SearchError::InvalidBaseUrl`] if
    /// the upstream client cannot be constructed.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, SearchError> {
        let client = PlacesClient::with_base_url(
            &config.places_api_key,
            &config.places_base_url,
            config.request_timeout_secs,
            config.max_retries,
            config.retry_backoff_base_ms,
        )?;
        Ok(Self::new(client, SearchConfig::from_app_config(config)))
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs one search and returns page `page_number` of size `page_size`.
    ///
    /// Upstream trouble degrades instead of failing: a failed geocode drops
    /// distance ranking, and failed pages shrink the result set (down to
    /// `ZERO_RESULTS`). The configured `search_timeout` bounds geocoding and
    /// every page request; pages that arrived before it ran out are still
    /// ranked and returned.
    ///
    /// A `ZERO_RESULTS` response reports `current_page = 1` whatever page
    /// was requested.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Validation`] for a blank query, a page size outside
    ///   `1..=60`, or page number 0.
    /// - [`SearchError::PageOutOfRange`] when the page starts past the end
    ///   of a non-empty result set.
    /// - [`SearchError::Timeout`] when the budget ran out before any page
    ///   arrived.
    pub async fn search(
        &self,
        query: &str,
        page_size: u32,
        page_number: u32,
    ) -> Result<SearchResult, SearchError> {
        validate_query(query)?;
        validate_page_request(page_size, page_number)?;

        let query = query.trim();
        let deadline = Instant::now() + self.config.search_timeout;
        let anchor = self.resolve_anchor(deadline).await;
        let fetch = self
            .client
            .fetch_all_before(query, anchor, &self.config.limits, deadline)
            .await;

        if fetch.places.is_empty() && fetch.stop == StopReason::Deadline {
            return Err(SearchError::Timeout {
                secs: self.config.search_timeout.as_secs(),
            });
        }

        if fetch.places.is_empty() {
            tracing::info!(query, requests = fetch.requests, "search returned no places");
            return Ok(SearchResult {
                status: SearchStatus::ZeroResults,
                results: Vec::new(),
                pagination: PaginationInfo::new(0, page_size, 1),
                anchor_location: anchor,
            });
        }

        let mut places: Vec<FormattedPlace> = fetch
            .places
            .into_iter()
            .map(|raw| format_place(raw, anchor, &self.config.links))
            .collect();
        rank_places(&mut places);

        let total = places.len();
        let range = page_bounds(total, page_size, page_number)?;
        let pagination = PaginationInfo::new(total, page_size, page_number);

        tracing::info!(
            query,
            requests = fetch.requests,
            total,
            page = page_number,
            page_size,
            anchored = anchor.is_some(),
            "search complete"
        );

        Ok(SearchResult {
            status: SearchStatus::Ok,
            results: places.drain(range).collect(),
            pagination,
            anchor_location: anchor,
        })
    }

    /// Resolves the configured anchor, degrading to `None` when geocoding
    /// fails or does not finish before `deadline`.
    async fn resolve_anchor(&self, deadline: Instant) -> Option<Coordinate> {
        let location = match &self.config.anchor {
            Anchor::None => return None,
            Anchor::Coordinate(coordinate) => return Some(*coordinate),
            Anchor::Location(location) => location,
        };

        match tokio::time::timeout_at(deadline, self.client.geocode(location)).await {
            Ok(Ok(coordinate)) => Some(coordinate),
            Ok(Err(e)) => {
                tracing::warn!(
                    location = %location,
                    error = %e,
                    "anchor geocoding failed; ranking by rating only"
                );
                None
            }
            Err(_) => {
                tracing::warn!(
                    location = %location,
                    "anchor geocoding hit the search deadline; ranking by rating only"
                );
                None
            }
        }
    }
}

/// Rejects empty or whitespace-only queries.
///
/// # Errors
///
/// Returns [`SearchError::Validation`] when `query` is blank.
pub fn validate_query(query: &str) -> Result<(), SearchError> {
    if query.trim().is_empty() {
        return Err(SearchError::Validation(
            "query must not be blank".to_string(),
        ));
    }
    Ok(())
}

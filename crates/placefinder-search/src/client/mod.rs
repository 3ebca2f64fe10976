//! HTTP client for the upstream places text-search and geocoding endpoints.

mod endpoint;
mod fetch_all;
mod geocode;

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::SearchError;
use crate::retry::retry_with_backoff;
use crate::types::{Coordinate, TextSearchResponse};

pub(crate) use endpoint::normalize_base_url;
pub use fetch_all::{FetchLimits, PageFetch, StopReason};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";

/// One upstream text-search request.
#[derive(Debug, Clone, Copy)]
pub enum PageRequest<'a> {
    /// The opening request for a query, optionally biased toward an anchor.
    First {
        query: &'a str,
        anchor: Option<Coordinate>,
        radius_m: u32,
    },
    /// A follow-up request carrying only the continuation token.
    Continuation { token: &'a str },
}

/// Client for the upstream places API.
///
/// Holds the API key and pre-resolved endpoint URLs. Use
/// [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
///
/// Transient errors (429, network failures, 5xx) are retried with
/// exponential backoff up to `max_retries` additional attempts. Error values
/// name the endpoint, never the full URL, so the API key stays out of logs.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    text_search_url: Url,
    geocode_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl PlacesClient {
    /// Creates a client pointed at the production places API.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, SearchError> {
        Self::with_base_url(
            api_key,
            DEFAULT_BASE_URL,
            timeout_secs,
            max_retries,
            backoff_base_ms,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SearchError::InvalidBaseUrl`] if
    /// `base_url` is not a usable URL base.
    pub fn with_base_url(
        api_key: &str,
        base_url: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent("placefinder/0.1 (place-search)")
            .build()?;

        let base = normalize_base_url(base_url)?;
        let text_search_url = endpoint::endpoint_url(&base, endpoint::TEXT_SEARCH_PATH)?;
        let geocode_url = endpoint::endpoint_url(&base, endpoint::GEOCODE_PATH)?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            text_search_url,
            geocode_url,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Fetches one page of text-search results.
    ///
    /// A non-`OK` upstream status is returned inside the response, not as
    /// an error; callers decide how to treat it.
    ///
    /// # Errors
    ///
    /// - [`SearchError::RateLimited`]: HTTP 429 after all retries.
    /// - [`SearchError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`SearchError::Http`]: network or TLS failure after all retries.
    /// - [`SearchError::Deserialize`]: body does not match the expected shape.
    pub async fn text_search_page(
        &self,
        request: &PageRequest<'_>,
    ) -> Result<TextSearchResponse, SearchError> {
        let url = self.text_search_request_url(request);
        self.get_json(url, endpoint::TEXT_SEARCH_PATH).await
    }

    /// Builds the text-search URL for `request` with percent-encoded parameters.
    fn text_search_request_url(&self, request: &PageRequest<'_>) -> Url {
        let mut url = self.text_search_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            match request {
                PageRequest::First {
                    query,
                    anchor,
                    radius_m,
                } => {
                    pairs.append_pair("query", query);
                    if let Some(anchor) = anchor {
                        pairs.append_pair("location", &anchor.to_query_value());
                        pairs.append_pair("radius", &radius_m.to_string());
                    }
                }
                PageRequest::Continuation { token } => {
                    pairs.append_pair("pagetoken", token);
                }
            }
            pairs.append_pair("key", &self.api_key);
        }
        url
    }

    /// Sends a GET with retry, asserts a 2xx status, and parses the body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        endpoint: &str,
    ) -> Result<T, SearchError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .map_err(reqwest::Error::without_url)?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(1);
                    return Err(SearchError::RateLimited { retry_after_secs });
                }

                if !status.is_success() {
                    return Err(SearchError::UnexpectedStatus {
                        status: status.as_u16(),
                        endpoint: endpoint.to_owned(),
                    });
                }

                let body = response.text().await.map_err(reqwest::Error::without_url)?;
                serde_json::from_str::<T>(&body).map_err(|e| SearchError::Deserialize {
                    context: endpoint.to_owned(),
                    source: e,
                })
            }
        })
        .await
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;

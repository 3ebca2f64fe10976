//! Multi-page text-search fetch loop for `PlacesClient`.

use std::collections::HashSet;
use std::time::Duration;

use tokio::time::Instant;

use crate::types::{Coordinate, RawPlace};

use super::{PageRequest, PlacesClient};

/// Ceilings and pacing for one [`PlacesClient::fetch_all`] run.
#[derive(Debug, Clone)]
pub struct FetchLimits {
    /// Never return more places than this.
    pub max_results: usize,
    /// Never issue more text-search requests than this.
    pub max_requests: usize,
    /// Wait before each continuation request. The upstream rejects a token
    /// that is used too soon after it was issued.
    pub page_token_delay: Duration,
    /// Bias radius around the anchor, in metres.
    pub radius_m: u32,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            max_results: 60,
            max_requests: 3,
            page_token_delay: Duration::from_secs(2),
            radius_m: 50_000,
        }
    }
}

/// Why the fetch loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The last page carried no continuation token.
    Exhausted,
    /// `max_results` places were collected.
    ResultCap,
    /// `max_requests` requests were issued.
    RequestCap,
    /// The upstream answered with a status other than `OK`/`ZERO_RESULTS`.
    UpstreamStatus(String),
    /// A request failed outright after retries.
    RequestFailed,
    /// The caller's deadline passed before the next page arrived.
    Deadline,
}

/// Outcome of a fetch run: the places in upstream order plus bookkeeping.
#[derive(Debug)]
pub struct PageFetch {
    pub places: Vec<RawPlace>,
    pub requests: usize,
    pub stop: StopReason,
}

impl PlacesClient {
    /// Collects places for `query` by following continuation tokens.
    ///
    /// The first request carries the query (and the anchor bias, if any);
    /// every later request carries only the token, preceded by
    /// `limits.page_token_delay`. Places repeated across pages are kept at
    /// their first position. The returned list is the accumulated sequence
    /// truncated to `limits.max_results`.
    ///
    /// Failures never discard pages already fetched: an upstream error
    /// status or a failed request ends the loop and whatever was
    /// accumulated is returned, possibly nothing.
    pub async fn fetch_all(
        &self,
        query: &str,
        anchor: Option<Coordinate>,
        limits: &FetchLimits,
    ) -> PageFetch {
        self.fetch_pages(query, anchor, limits, None).await
    }

    /// [`PlacesClient::fetch_all`] bounded by `deadline`.
    ///
    /// Each page request (and the token delay before it) gets only the time
    /// left until `deadline`. When that runs out the loop stops with
    /// [`StopReason::Deadline`] and the pages already collected are kept.
    pub async fn fetch_all_before(
        &self,
        query: &str,
        anchor: Option<Coordinate>,
        limits: &FetchLimits,
        deadline: Instant,
    ) -> PageFetch {
        self.fetch_pages(query, anchor, limits, Some(deadline)).await
    }

    async fn fetch_pages(
        &self,
        query: &str,
        anchor: Option<Coordinate>,
        limits: &FetchLimits,
        deadline: Option<Instant>,
    ) -> PageFetch {
        let mut places: Vec<RawPlace> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut token: Option<String> = None;
        let mut requests = 0usize;

        let stop = loop {
            if places.len() >= limits.max_results {
                break StopReason::ResultCap;
            }
            if requests >= limits.max_requests {
                break StopReason::RequestCap;
            }

            let request = match token.as_deref() {
                None => PageRequest::First {
                    query,
                    anchor,
                    radius_m: limits.radius_m,
                },
                Some(token) => {
                    if deadline.is_some_and(|d| Instant::now() + limits.page_token_delay >= d) {
                        break StopReason::Deadline;
                    }
                    if !limits.page_token_delay.is_zero() {
                        tokio::time::sleep(limits.page_token_delay).await;
                    }
                    PageRequest::Continuation { token }
                }
            };

            requests += 1;
            let page = self.text_search_page(&request);
            let outcome = match deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, page).await.ok(),
                None => Some(page.await),
            };
            let Some(outcome) = outcome else {
                tracing::warn!(
                    query,
                    page = requests,
                    kept = places.len(),
                    "search deadline reached mid-fetch; keeping pages fetched so far"
                );
                break StopReason::Deadline;
            };
            let response = match outcome {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(
                        query,
                        page = requests,
                        kept = places.len(),
                        error = %e,
                        "text-search page request failed; keeping pages fetched so far"
                    );
                    break StopReason::RequestFailed;
                }
            };

            if !response.is_success() {
                tracing::warn!(
                    query,
                    page = requests,
                    status = %response.status,
                    message = response.error_message.as_deref().unwrap_or(""),
                    kept = places.len(),
                    "text-search returned a non-success status"
                );
                break StopReason::UpstreamStatus(response.status);
            }

            let received = response.results.len();
            let before = places.len();
            for place in response.results {
                if seen.insert(place.place_id.clone()) {
                    places.push(place);
                }
            }
            tracing::debug!(
                query,
                page = requests,
                received,
                added = places.len() - before,
                has_token = response.next_page_token.is_some(),
                "fetched text-search page"
            );

            match response.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => token = Some(next),
                None => break StopReason::Exhausted,
            }
        };

        places.truncate(limits.max_results);
        tracing::debug!(
            query,
            requests,
            total = places.len(),
            stop = ?stop,
            "text-search fetch finished"
        );

        PageFetch {
            places,
            requests,
            stop,
        }
    }
}

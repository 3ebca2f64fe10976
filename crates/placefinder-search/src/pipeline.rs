//! Inbound request handling: optional rewrite, then search.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::rewrite::QueryRewriter;
use crate::search::{validate_query, PlaceSearch, SearchResult};

/// Inbound search request.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    /// Results per page.
    #[serde(default = "default_top_n")]
    pub top_n: u32,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_top_n() -> u32 {
    5
}

fn default_page() -> u32 {
    1
}

impl SearchRequest {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_n: default_top_n(),
            page: default_page(),
        }
    }
}

/// A [`SearchResult`] plus the query before and after rewriting.
///
/// `original_query`/`processed_query` are present only when a rewriter ran.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub result: SearchResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_query: Option<String>,
}

/// Runs one inbound request end to end.
///
/// The query is validated before the rewriter sees it. A rewriter failure
/// is swallowed and the original query is searched instead.
///
/// # Errors
///
/// Propagates [`SearchError`] from validation and [`PlaceSearch::search`].
pub async fn run_search(
    engine: &PlaceSearch,
    rewriter: Option<&QueryRewriter>,
    request: &SearchRequest,
) -> Result<SearchResponse, SearchError> {
    validate_query(&request.query)?;
    let original = request.query.trim();

    let processed = match rewriter {
        Some(rewriter) => Some(rewriter.rewrite_or_original(original).await),
        None => None,
    };
    let query = processed.as_deref().unwrap_or(original);

    let result = engine.search(query, request.top_n, request.page).await?;

    Ok(SearchResponse {
        result,
        original_query: processed.as_ref().map(|_| original.to_owned()),
        processed_query: processed,
    })
}

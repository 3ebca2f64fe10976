//! Base URL handling for the upstream places API.

use reqwest::Url;

use crate::error::SearchError;

pub(super) const TEXT_SEARCH_PATH: &str = "place/textsearch/json";
pub(super) const GEOCODE_PATH: &str = "geocode/json";

/// Parses `base_url` so relative endpoint paths resolve beneath it.
///
/// Given `"https://maps.googleapis.com/maps/api"`, returns
/// `"https://maps.googleapis.com/maps/api/"`. Without the trailing slash
/// `Url::join` would replace the last path segment instead of appending.
pub(crate) fn normalize_base_url(base_url: &str) -> Result<Url, SearchError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    let url = Url::parse(&normalised).map_err(|e| SearchError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(SearchError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: "URL cannot be used as a base".to_owned(),
        });
    }
    Ok(url)
}

/// Resolves `path` against an already-normalised base.
pub(super) fn endpoint_url(base: &Url, path: &str) -> Result<Url, SearchError> {
    base.join(path).map_err(|e| SearchError::InvalidBaseUrl {
        base_url: base.to_string(),
        reason: format!("cannot resolve \"{path}\": {e}"),
    })
}

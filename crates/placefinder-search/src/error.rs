use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search input: {0}")]
    Validation(String),

    #[error("page {page} is out of range: only {total_pages} page(s) available")]
    PageOutOfRange { page: u32, total_pages: u32 },

    #[error("could not geocode \"{location}\": {reason}")]
    Geocode { location: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by upstream (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },

    #[error("query rewrite failed: {0}")]
    Rewrite(String),

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("search did not finish within {secs}s")]
    Timeout { secs: u64 },
}

impl SearchError {
    /// `true` for errors caused by the caller's input rather than upstream
    /// or configuration trouble.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::PageOutOfRange { .. })
    }
}

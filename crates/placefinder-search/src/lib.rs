//! Place search aggregation engine.
//!
//! Drives a paged upstream text-search API to collect up to 60 places,
//! ranks them by distance from an optional anchor and by rating, and slices
//! the ranked set into caller-sized pages.

pub mod client;
pub mod distance;
pub mod error;
pub mod format;
pub mod pagination;
pub mod pipeline;
pub mod rank;
pub mod rewrite;
pub mod search;
pub mod types;

mod retry;

pub use client::{FetchLimits, PageFetch, PageRequest, PlacesClient, StopReason};
pub use distance::haversine_km;
pub use error::SearchError;
pub use format::{format_place, FormattedPlace, MapsLinks};
pub use pagination::{PaginationInfo, MAX_PAGE_SIZE};
pub use pipeline::{run_search, SearchRequest, SearchResponse};
pub use rank::rank_places;
pub use rewrite::QueryRewriter;
pub use search::{Anchor, PlaceSearch, SearchConfig, SearchResult, SearchStatus};
pub use types::{Coordinate, RawPlace};

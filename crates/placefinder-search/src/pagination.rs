//! Re-slicing the aggregated result set into caller-sized pages.
//!
//! The upstream source pages in its own fixed size; callers ask for any
//! page size in `1..=MAX_PAGE_SIZE`. Everything here is pure arithmetic over
//! `(total_results, results_per_page, current_page)`.
//!
//! An empty result set has `total_pages == 0`.

use std::ops::Range;

use serde::Serialize;

use crate::error::SearchError;

/// Largest page size a caller may request; equals the aggregation ceiling.
pub const MAX_PAGE_SIZE: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    pub current_page: u32,
    pub total_results: usize,
    pub results_per_page: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PaginationInfo {
    #[must_use]
    pub fn new(total_results: usize, results_per_page: u32, current_page: u32) -> Self {
        let total_pages = total_pages(total_results, results_per_page);
        Self {
            current_page,
            total_results,
            results_per_page,
            total_pages,
            has_next_page: current_page < total_pages,
            has_prev_page: current_page > 1,
        }
    }
}

/// `ceil(total_results / results_per_page)`, saturating at `u32::MAX`.
#[must_use]
pub fn total_pages(total_results: usize, results_per_page: u32) -> u32 {
    if results_per_page == 0 {
        return 0;
    }
    let pages = total_results.div_ceil(results_per_page as usize);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Checks page size and page number before any upstream work is done.
///
/// # Errors
///
/// Returns [`SearchError::Validation`] when `page_size` is outside
/// `1..=MAX_PAGE_SIZE` or `page_number` is zero.
pub fn validate_page_request(page_size: u32, page_number: u32) -> Result<(), SearchError> {
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(SearchError::Validation(format!(
            "page size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
        )));
    }
    if page_number < 1 {
        return Err(SearchError::Validation(
            "page number must be 1 or greater".to_string(),
        ));
    }
    Ok(())
}

/// Index range of `page_number` within a result set of `total_results`.
///
/// # Errors
///
/// Returns [`SearchError::PageOutOfRange`] when the page starts at or past
/// the end of the result set.
pub fn page_bounds(
    total_results: usize,
    page_size: u32,
    page_number: u32,
) -> Result<Range<usize>, SearchError> {
    let size = page_size as usize;
    let start = (page_number as usize).saturating_sub(1).saturating_mul(size);
    if start >= total_results {
        return Err(SearchError::PageOutOfRange {
            page: page_number,
            total_pages: total_pages(total_results, page_size),
        });
    }
    let end = start.saturating_add(size).min(total_results);
    Ok(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(7, 5), 2);
        assert_eq!(total_pages(10, 5), 2);
        assert_eq!(total_pages(11, 5), 3);
        assert_eq!(total_pages(1, 60), 1);
    }

    #[test]
    fn total_pages_is_zero_for_empty_set() {
        assert_eq!(total_pages(0, 5), 0);
    }

    #[test]
    fn first_page_has_no_previous() {
        let info = PaginationInfo::new(12, 5, 1);
        assert_eq!(info.total_pages, 3);
        assert!(info.has_next_page);
        assert!(!info.has_prev_page);
    }

    #[test]
    fn last_page_has_no_next() {
        let info = PaginationInfo::new(12, 5, 3);
        assert!(!info.has_next_page);
        assert!(info.has_prev_page);
    }

    #[test]
    fn single_page_has_neither_direction() {
        let info = PaginationInfo::new(4, 5, 1);
        assert_eq!(info.total_pages, 1);
        assert!(!info.has_next_page);
        assert!(!info.has_prev_page);
    }

    #[test]
    fn empty_set_on_first_page_has_neither_direction() {
        let info = PaginationInfo::new(0, 5, 1);
        assert_eq!(info.total_pages, 0);
        assert!(!info.has_next_page);
        assert!(!info.has_prev_page);
    }

    #[test]
    fn validate_rejects_zero_page_size() {
        assert!(matches!(
            validate_page_request(0, 1),
            Err(SearchError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_page_size_above_ceiling() {
        assert!(matches!(
            validate_page_request(61, 1),
            Err(SearchError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_page_zero() {
        assert!(matches!(
            validate_page_request(5, 0),
            Err(SearchError::Validation(_))
        ));
    }

    #[test]
    fn validate_accepts_boundaries() {
        assert!(validate_page_request(1, 1).is_ok());
        assert!(validate_page_request(60, 99).is_ok());
    }

    #[test]
    fn bounds_for_partial_last_page() {
        assert_eq!(page_bounds(7, 5, 2).unwrap(), 5..7);
    }

    #[test]
    fn bounds_out_of_range_reports_total_pages() {
        let err = page_bounds(7, 5, 3).unwrap_err();
        assert!(
            matches!(
                err,
                SearchError::PageOutOfRange {
                    page: 3,
                    total_pages: 2
                }
            ),
            "got {err:?}"
        );
    }

    #[test]
    fn slice_lengths_match_formula_for_every_page() {
        for total in 1..=60usize {
            for size in 1..=12u32 {
                let pages = total_pages(total, size);
                let mut seen = Vec::new();
                for page in 1..=pages {
                    let range = page_bounds(total, size, page).unwrap();
                    let expected = (size as usize).min(total - (page as usize - 1) * size as usize);
                    assert_eq!(range.len(), expected, "total={total} size={size} page={page}");
                    seen.extend(range);
                }
                let all: Vec<usize> = (0..total).collect();
                assert_eq!(seen, all, "pages must cover each index exactly once");
                assert!(page_bounds(total, size, pages + 1).is_err());
            }
        }
    }
}

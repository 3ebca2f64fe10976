//! Composite distance/rating ordering.
//!
//! Places with a known distance come first. Two places whose distances
//! differ by less than [`DISTANCE_BAND_KM`] are treated as equally close and
//! ordered by rating; otherwise the nearer one wins. Places without a
//! distance are ordered by rating alone. A missing rating counts as `0.0`.

use std::cmp::Ordering;

use crate::format::FormattedPlace;

/// Distances closer than this are compared by rating instead.
pub const DISTANCE_BAND_KM: f64 = 0.5;

/// Pairwise ordering of two places under the composite rule.
#[must_use]
pub fn compare_places(a: &FormattedPlace, b: &FormattedPlace) -> Ordering {
    match (a.distance_km, b.distance_km) {
        (Some(da), Some(db)) => {
            if (da - db).abs() < DISTANCE_BAND_KM {
                by_rating_desc(a, b)
            } else {
                da.total_cmp(&db)
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => by_rating_desc(a, b),
    }
}

fn by_rating_desc(a: &FormattedPlace, b: &FormattedPlace) -> Ordering {
    let ra = a.rating.unwrap_or(0.0);
    let rb = b.rating.unwrap_or(0.0);
    rb.total_cmp(&ra)
}

/// Stable in-place sort by [`compare_places`].
///
/// The distance band makes the rule non-transitive (A≈B and B≈C do not imply
/// A≈C), which `slice::sort_by` is allowed to reject with a panic. Insertion
/// sort only ever compares neighbours, so any input yields a deterministic
/// order. Inputs are capped at a few dozen places.
pub fn rank_places(places: &mut [FormattedPlace]) {
    for i in 1..places.len() {
        let mut j = i;
        while j > 0 && compare_places(&places[j], &places[j - 1]) == Ordering::Less {
            places.swap(j, j - 1);
            j -= 1;
        }
    }
}

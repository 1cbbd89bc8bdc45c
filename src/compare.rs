//! Total order over keys, shared by the batch sorter and the verifier.

use crate::config::SortConfig;
use crate::key::Key;
use std::cmp::Ordering;

/// Compare two keys ignoring the reverse flag.
///
/// Month index decides first when month mode is active (unrecognized sorts
/// before January). Then, if either side has a numeric value, numbers
/// decide and a missing value sorts lowest. Otherwise raw bytes decide.
#[inline]
pub fn compare_natural(a: &Key, b: &Key, config: &SortConfig) -> Ordering {
    if config.month {
        let by_month = a.month.cmp(&b.month);
        if by_month != Ordering::Equal {
            return by_month;
        }
    }

    match (a.numeric, b.numeric) {
        (Some(x), Some(y)) => compare_f64(x, y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.raw.cmp(b.raw),
    }
}

/// Compare two keys with the reverse flag applied
#[inline]
pub fn compare_keys(a: &Key, b: &Key, config: &SortConfig) -> Ordering {
    let cmp = compare_natural(a, b, config);
    if config.reverse {
        cmp.reverse()
    } else {
        cmp
    }
}

/// Whether two keys are interchangeable for unique output
#[inline]
pub fn keys_equal(a: &Key, b: &Key, config: &SortConfig) -> bool {
    compare_natural(a, b, config) == Ordering::Equal
}

// Keys never hold NaN, so partial_cmp is total here and treats -0 and 0 alike.
#[inline]
fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

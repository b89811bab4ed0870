//! Pixel-level isoline markers

// crate modules
use crate::plane::PlaneSlice;
use crate::remap::level_threshold;

// chgtools modules
use chgtools_field::is_out_of_domain;

// standard library
use std::collections::BTreeSet;

// external crates
use log::{debug, trace, warn};

/// Upper limit on the number of isoline bins between `low` and `high`
pub const MAX_ISOLINE_BINS: usize = 1 << 16;

/// Find every pixel where the raw values cross an isoline level
///
/// Levels are evenly spaced in display space from `low` to `high` inclusive,
/// `bin_count + 2` of them in total. The bin count is capped at
/// [MAX_ISOLINE_BINS].
///
/// ```text
/// binsize = (high - low) / (bin_count + 1)
/// level_k = low + k * binsize
/// ```
///
/// Each level is mapped back to a raw threshold (see
/// [level_threshold](crate::level_threshold)). With `allow_negative` the zero
/// crossing is always tested, once, regardless of where the levels fall.
///
/// An interior pixel is marked when either its horizontal or vertical pair of
/// neighbours straddle a threshold, one strictly below and one strictly above.
/// Border pixels are never marked, and neighbour pairs that include a point
/// outside of the cell are ignored.
///
/// These are markers, not traced contours. Adjacent marked pixels are not
/// joined into lines.
///
/// ```rust
/// # use chgtools_slice::{isolines, PlaneSlice};
/// // 4x3 px ramp from -15 to 15 along x
/// let raw = vec![
///     -15.0, -5.0, 5.0, 15.0,
///     -15.0, -5.0, 5.0, 15.0,
///     -15.0, -5.0, 5.0, 15.0,
/// ];
/// let plane = PlaneSlice::from_values(4, 3, raw, true).unwrap();
///
/// // only the zero crossing is inside the range
/// let markers = isolines(&plane, 3, -1.0, 1.0, true);
/// assert_eq!(markers.into_iter().collect::<Vec<_>>(), vec![(1, 1), (2, 1)]);
/// ```
pub fn isolines(
    plane: &PlaneSlice,
    bin_count: usize,
    low: f64,
    high: f64,
    allow_negative: bool,
) -> BTreeSet<(usize, usize)> {
    let thresholds = thresholds(bin_count, low, high, allow_negative);
    debug!("Isoline thresholds: {thresholds:?}");

    let mut markers = BTreeSet::new();
    for threshold in thresholds {
        let before = markers.len();
        mark_crossings(plane, threshold, &mut markers);
        trace!("{} new markers at {threshold:e}", markers.len() - before);
    }

    debug!("Marked {} px as isolines", markers.len());
    markers
}

/// Unique raw thresholds for every level between `low` and `high`
pub fn thresholds(bin_count: usize, low: f64, high: f64, allow_negative: bool) -> Vec<f64> {
    if bin_count > MAX_ISOLINE_BINS {
        warn!("{bin_count} isoline bins requested, capped at {MAX_ISOLINE_BINS}");
    }
    let bins = bin_count.min(MAX_ISOLINE_BINS) + 1;
    let binsize = (high - low) / bins as f64;

    let mut thresholds: Vec<f64> = (0..=bins)
        .filter_map(|k| level_threshold(low + k as f64 * binsize, allow_negative))
        .filter(|t| t.is_finite())
        .collect();

    if allow_negative {
        thresholds.push(0.0);
    }

    thresholds.sort_by(|a, b| a.total_cmp(b));
    thresholds.dedup();
    thresholds
}

/// Mark every interior pixel with neighbours either side of the threshold
fn mark_crossings(plane: &PlaneSlice, threshold: f64, markers: &mut BTreeSet<(usize, usize)>) {
    let (ix, iy) = (plane.ix(), plane.iy());
    if ix < 3 || iy < 3 {
        return;
    }

    let raw = plane.raw();
    let at = |i: usize, j: usize| raw[j * ix + i];

    for j in 1..iy - 1 {
        for i in 1..ix - 1 {
            let vertical = crosses(at(i, j - 1), at(i, j + 1), threshold);
            let horizontal = crosses(at(i - 1, j), at(i + 1, j), threshold);
            if vertical || horizontal {
                markers.insert((i, j));
            }
        }
    }
}

/// Strict sign change of `a - threshold` and `b - threshold`
fn crosses(a: f64, b: f64, threshold: f64) -> bool {
    if is_out_of_domain(a) || is_out_of_domain(b) {
        return false;
    }
    (a < threshold && b > threshold) || (a > threshold && b < threshold)
}

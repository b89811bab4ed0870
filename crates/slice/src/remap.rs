//! Display remapping of raw density values
//!
//! Densities span many orders of magnitude, so slices are coloured on a
//! logarithmic scale. Fields that may be negative (e.g. density differences)
//! use a three-band signed log instead.
//!
//! | Raw value              | Display value        |
//! | ---------------------- | -------------------- |
//! | `raw < -10`            | `-log10(-raw)`       |
//! | `-10 <= raw <= 10`     | `raw / 10`           |
//! | `raw > 10`             | `log10(raw)`         |
//!
//! The bands meet at +/-1 in display space, which is where isoline levels
//! switch back from the log bands to the zero crossing.

/// Raw magnitude above which the signed remap is logarithmic
pub const SIGNED_LOG_THRESHOLD: f64 = 10.0;

/// Divisor applied to raw values inside the linear band
pub const LINEAR_BAND_SCALE: f64 = 10.0;

/// Display magnitude above which isoline levels map back through the log bands
pub const ISOLINE_LOG_BOUNDARY: f64 = 1.0;

/// Map a raw value onto the display scale
///
/// With `allow_negative = false` this is a plain `log10`, so any raw value
/// that is not positive becomes `-inf` and is clamped to the bottom of the
/// palette when coloured.
///
/// ```rust
/// # use chgtools_slice::remap;
/// assert_eq!(remap(100.0, false), 2.0);
/// assert_eq!(remap(0.0, false), f64::NEG_INFINITY);
/// assert_eq!(remap(-5.0, false), f64::NEG_INFINITY);
///
/// assert_eq!(remap(-1000.0, true), -3.0);
/// assert_eq!(remap(5.0, true), 0.5);
/// assert_eq!(remap(100.0, true), 2.0);
/// ```
pub fn remap(raw: f64, allow_negative: bool) -> f64 {
    if !allow_negative {
        return if raw > 0.0 {
            raw.log10()
        } else {
            f64::NEG_INFINITY
        };
    }

    if raw < -SIGNED_LOG_THRESHOLD {
        -(-raw).log10()
    } else if raw > SIGNED_LOG_THRESHOLD {
        raw.log10()
    } else {
        raw / LINEAR_BAND_SCALE
    }
}

/// Raw threshold corresponding to a display-space isoline level
///
/// Returns `None` for levels inside the linear band of the signed remap. Only
/// the zero crossing is traced there, and it is always added separately.
///
/// ```rust
/// # use chgtools_slice::level_threshold;
/// assert_eq!(level_threshold(2.0, false), Some(100.0));
/// assert_eq!(level_threshold(-1.0, false), Some(0.1));
///
/// assert_eq!(level_threshold(-2.0, true), Some(-100.0));
/// assert_eq!(level_threshold(0.5, true), None);
/// assert_eq!(level_threshold(3.0, true), Some(1000.0));
/// ```
pub fn level_threshold(level: f64, allow_negative: bool) -> Option<f64> {
    if !allow_negative {
        return Some(10f64.powf(level));
    }

    if level < -ISOLINE_LOG_BOUNDARY {
        Some(-(10f64.powf(-level)))
    } else if level > ISOLINE_LOG_BOUNDARY {
        Some(10f64.powf(level))
    } else {
        None
    }
}

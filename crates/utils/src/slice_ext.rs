use crate::error::{Error, Result};

/// Extends functionality for slices of f64 values
pub trait SliceExt {
    /// Find the (min, max) of only the finite values
    ///
    /// Display buffers routinely hold `-inf` where the density is not
    /// positive, so this skips anything that is not finite rather than
    /// failing outright.
    ///
    /// ```rust
    /// # use chgtools_utils::{Error, SliceExt};
    /// let display = [f64::NEG_INFINITY, -1.5, 0.25, f64::NAN, 3.0];
    /// assert_eq!(display.finite_range(), Ok((-1.5, 3.0)));
    ///
    /// let blank = [f64::NEG_INFINITY, f64::NAN];
    /// assert_eq!(blank.finite_range(), Err(Error::SliceContainsNoFiniteValues { length: 2 }));
    /// ```
    fn finite_range(&self) -> Result<(f64, f64)>;
}

impl SliceExt for [f64] {
    fn finite_range(&self) -> Result<(f64, f64)> {
        if self.is_empty() {
            return Err(Error::SliceContainsNoValues);
        }

        self.iter()
            .filter(|v| v.is_finite())
            .fold(None, |range: Option<(f64, f64)>, &v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .ok_or(Error::SliceContainsNoFiniteValues {
                length: self.len(),
            })
    }
}

use crate::f;

/// Extends float primitives with formatting and tolerance helpers
pub trait FloatExt {
    /// Consistent scientific number formatting
    ///
    /// The default `{:e}` output drops the exponent sign and padding, which
    /// makes columns of grid values and lattice vectors hard to read.
    ///
    /// ```rust
    /// # use chgtools_utils::FloatExt;
    /// assert_eq!((-1.0_f64).sci(5, 2), "-1.00000e+00".to_string());
    /// assert_eq!(3.61_f64.sci(3, 2), "3.610e+00".to_string());
    /// assert_eq!(0.0012_f64.sci(2, 3), "1.20e-003".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;

    /// Check that the magnitude is no larger than an absolute tolerance
    ///
    /// ```rust
    /// # use chgtools_utils::FloatExt;
    /// assert!(1.0e-14_f64.is_negligible(1.0e-12));
    /// assert!((-1.0e-14_f64).is_negligible(1.0e-12));
    /// assert!(!0.1_f64.is_negligible(1.0e-12));
    /// assert!(!f64::NAN.is_negligible(1.0e-12));
    /// ```
    fn is_negligible(&self, tolerance: f64) -> bool;
}

impl FloatExt for f64 {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let mut num = f!("{:.precision$e}", self, precision = precision);
        // `{:e}` on a finite f64 always contains 'e', non-finite values do not
        let Some(position) = num.find('e') else {
            return num;
        };
        let exp = num.split_off(position);
        let (sign, exp) = match exp.strip_prefix("e-") {
            Some(exp) => ('-', exp),
            None => ('+', &exp[1..]),
        };
        num.push_str(&f!("e{}{:0>pad$}", sign, exp, pad = exp_pad));
        num
    }

    fn is_negligible(&self, tolerance: f64) -> bool {
        self.abs() <= tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_values_are_left_alone() {
        assert_eq!(f64::INFINITY.sci(3, 2), "inf");
        assert_eq!(f64::NEG_INFINITY.sci(3, 2), "-inf");
        assert_eq!(f64::NAN.sci(3, 2), "NaN");
    }

    #[test]
    fn exponent_padding() {
        assert_eq!(1.0e-30_f64.sci(1, 2), "1.0e-30");
        assert_eq!(1.0e5_f64.sci(1, 4), "1.0e+0005");
    }
}

//! Trilinear sampling of a [ScalarField] at arbitrary real-space points

// crate modules
use crate::error::Result;
use crate::field::ScalarField;
use crate::lattice::GridScaling;

// external crates
use itertools::iproduct;
use nalgebra::Vector3;

/// Value returned for points outside of the unit cell
///
/// Deliberately far below any physical density and any display range, so it
/// can never be confused with a genuine zero (or small negative) value.
pub const OUT_OF_DOMAIN: f64 = -1.0e30;

/// Slack on the fractional coordinates before a point is out of the cell
const DOMAIN_TOLERANCE: f64 = 1.0e-9;

/// Check a sampled value against the [OUT_OF_DOMAIN] sentinel
///
/// ```rust
/// # use chgtools_field::{is_out_of_domain, OUT_OF_DOMAIN};
/// assert!(is_out_of_domain(OUT_OF_DOMAIN));
/// assert!(!is_out_of_domain(0.0));
/// assert!(!is_out_of_domain(-1.0));
/// ```
pub fn is_out_of_domain(value: f64) -> bool {
    value <= OUT_OF_DOMAIN
}

impl ScalarField {
    /// Interpolated value at a real-space point
    ///
    /// Points outside of the cell return [OUT_OF_DOMAIN] rather than an error,
    /// since sampling a plane will routinely step off the edge of the cell.
    ///
    /// A point is outside if any coordinate is negative or greater than the
    /// cell extent along that axis (see [max_extent](ScalarField::max_extent)),
    /// or if its fractional coordinates are outside of the parallelepiped. The
    /// second check only matters for non-orthogonal cells.
    ///
    /// Values are blended from the 8 surrounding grid points, with the corner
    /// (a, b, c) weighted by
    ///
    /// ```text
    /// (a ? xd : 1-xd) * (b ? yd : 1-yd) * (c ? zd : 1-zd)
    /// ```
    ///
    /// where xd, yd, zd are the fractional remainders of the grid coordinate.
    ///
    /// ```rust
    /// # use chgtools_field::{Lattice, ScalarField, OUT_OF_DOMAIN};
    /// # use nalgebra::Vector3;
    /// let lattice = Lattice::new([
    ///     [1.0, 0.0, 0.0],
    ///     [0.0, 1.0, 0.0],
    ///     [0.0, 0.0, 1.0],
    /// ]).unwrap();
    ///
    /// let mut values = vec![0.0; 8];
    /// values[7] = 1.0;
    /// let field = ScalarField::new(lattice, [2, 2, 2], values).unwrap();
    ///
    /// // only the (1,1,1) corner contributes, weighted 0.5^3
    /// let value = field.sample(&Vector3::new(0.5, 0.5, 0.5)).unwrap();
    /// assert_eq!(value, 0.125);
    ///
    /// // anything outside of the cell is the sentinel
    /// let value = field.sample(&Vector3::new(-0.1, 0.5, 0.5)).unwrap();
    /// assert_eq!(value, OUT_OF_DOMAIN);
    /// ```
    pub fn sample(&self, point: &Vector3<f64>) -> Result<f64> {
        if !self.is_within_extent(point) {
            return Ok(OUT_OF_DOMAIN);
        }

        let fractional = self.lattice.to_fractional(point);
        if fractional
            .iter()
            .any(|f| *f < -DOMAIN_TOLERANCE || *f > 1.0 + DOMAIN_TOLERANCE)
        {
            return Ok(OUT_OF_DOMAIN);
        }

        // corner indices and remainders along each axis
        let mut lower = [0usize; 3];
        let mut upper = [0usize; 3];
        let mut remainder = [0.0; 3];

        let grid = self.to_grid(point);
        for axis in 0..3 {
            let n = self.dimensions[axis];
            let divisions = self.scaling.divisions(n);
            let g = grid[axis].clamp(0.0, divisions);

            remainder[axis] = g.rem_euclid(1.0);
            lower[axis] = g.floor() as usize;
            upper[axis] = g.ceil() as usize;

            if self.scaling == GridScaling::Periodic && n > 0 {
                lower[axis] %= n;
                upper[axis] %= n;
            }
        }

        let [xd, yd, zd] = remainder;
        let mut value = 0.0;
        for (a, b, c) in iproduct!(0..2, 0..2, 0..2) {
            let weight = corner_weight(a, xd) * corner_weight(b, yd) * corner_weight(c, zd);
            let i = if a == 1 { upper[0] } else { lower[0] };
            let j = if b == 1 { upper[1] } else { lower[1] };
            let k = if c == 1 { upper[2] } else { lower[2] };
            value += weight * self.get_value(i, j, k)?;
        }

        Ok(value)
    }

    /// Interpolated value at (x, y, z)
    pub fn sample_xyz(&self, x: f64, y: f64, z: f64) -> Result<f64> {
        self.sample(&Vector3::new(x, y, z))
    }

    /// Axis-aligned check against the origin and the far corner of the cell
    fn is_within_extent(&self, point: &Vector3<f64>) -> bool {
        (0..3).all(|axis| {
            let p = point[axis];
            p.is_finite() && p >= 0.0 && p <= self.max_extent(axis)
        })
    }
}

/// Weight of the lower (0) or upper (1) corner along one axis
fn corner_weight(corner: usize, remainder: f64) -> f64 {
    if corner == 1 {
        remainder
    } else {
        1.0 - remainder
    }
}

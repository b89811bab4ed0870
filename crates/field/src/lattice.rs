//! Module for lattice-related data and coordinate transforms

// crate modules
use crate::error::{Error, Result};

// chgtools modules
use chgtools_utils::{f, FloatExt};

// external crates
use nalgebra::{Matrix3, Vector3};

/// Relative tolerance on the determinant before a lattice is considered flat
const DETERMINANT_TOLERANCE: f64 = 1.0e-12;

/// Convention for mapping fractional coordinates onto grid indices
///
/// Density grids are written as `nx*ny*nz` samples over a unit cell, but there
/// are two reasonable ways to place those samples.
///
/// | Variant     | Scale factor | Grid index `n-1` lands on      |
/// | ----------- | ------------ | ------------------------------ |
/// | `NodeExact` | `n - 1`      | the far face of the cell       |
/// | `Periodic`  | `n`          | one step short of the far face |
///
/// `NodeExact` is the default, so index 0 and index `n-1` land exactly on the
/// first and last samples and a node always reproduces its stored value.
///
/// `Periodic` follows the VASP convention of a periodic grid where index `n`
/// wraps back around to index 0.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GridScaling {
    /// Scale fractional coordinates by `n - 1`
    #[default]
    NodeExact,
    /// Scale fractional coordinates by `n`, wrapping indices
    Periodic,
}

impl GridScaling {
    /// Number of grid steps across the cell for `n` samples on an axis
    pub fn divisions(&self, n: usize) -> f64 {
        match self {
            GridScaling::NodeExact => n.saturating_sub(1) as f64,
            GridScaling::Periodic => n as f64,
        }
    }
}

/// Unit cell of the density grid
///
/// Rows of the `matrix` are the real-space cell edge vectors a, b, and c, in
/// the same units as the file (usually Angstrom) and already multiplied by the
/// scalar from the file header.
///
/// The `inverse` is constructed explicitly from cofactors when the lattice is
/// created, and maps real-space points directly onto fractional coordinates.
///
/// ```rust
/// # use chgtools_field::Lattice;
/// # use nalgebra::Vector3;
/// let lattice = Lattice::new([
///     [4.0, 0.0, 0.0],
///     [0.0, 2.0, 0.0],
///     [0.0, 0.0, 5.0],
/// ]).unwrap();
///
/// let fractional = lattice.to_fractional(&Vector3::new(2.0, 1.0, 1.0));
/// assert_eq!(fractional, Vector3::new(0.5, 0.5, 0.2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lattice {
    matrix: Matrix3<f64>,
    inverse: Matrix3<f64>,
    determinant: f64,
}

impl Lattice {
    /// Build a lattice from the three cell vectors
    ///
    /// Fails with [Error::DegenerateGeometry] if the vectors do not span a
    /// volume, i.e. the matrix can not be inverted.
    pub fn new(vectors: [[f64; 3]; 3]) -> Result<Self> {
        let [a, b, c] = vectors;
        Self::from_matrix(Matrix3::new(
            a[0], a[1], a[2], //
            b[0], b[1], b[2], //
            c[0], c[1], c[2],
        ))
    }

    /// Build a lattice from a matrix with rows of cell vectors
    pub fn from_matrix(matrix: Matrix3<f64>) -> Result<Self> {
        let (inverse, determinant) = cofactor_inverse(&matrix)?;
        Ok(Self {
            matrix,
            inverse,
            determinant,
        })
    }

    /// Rows of cell vectors
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Matrix mapping real-space points to fractional coordinates
    pub fn inverse(&self) -> &Matrix3<f64> {
        &self.inverse
    }

    /// Signed determinant of the lattice matrix
    pub fn determinant(&self) -> f64 {
        self.determinant
    }

    /// Volume of the unit cell
    pub fn volume(&self) -> f64 {
        self.determinant.abs()
    }

    /// Maximum real-space extent of the cell along a cartesian axis
    ///
    /// This is the column sum of the lattice matrix, i.e. the coordinate of
    /// the far corner `a + b + c` of the cell.
    pub fn max_extent(&self, axis: usize) -> f64 {
        self.matrix.column(axis).sum()
    }

    /// Convert a real-space point to fractional coordinates
    pub fn to_fractional(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.inverse * point
    }

    /// Convert fractional coordinates to a real-space point
    pub fn to_cartesian(&self, fractional: &Vector3<f64>) -> Vector3<f64> {
        self.matrix.tr_mul(fractional)
    }

    /// Convert a real-space point to continuous grid-index space
    pub fn to_grid(
        &self,
        point: &Vector3<f64>,
        dimensions: [usize; 3],
        scaling: GridScaling,
    ) -> Vector3<f64> {
        let mut grid = self.to_fractional(point);
        for axis in 0..3 {
            grid[axis] *= scaling.divisions(dimensions[axis]);
        }
        grid
    }

    /// Convert a continuous grid-index coordinate to a real-space point
    pub fn to_real(
        &self,
        grid: &Vector3<f64>,
        dimensions: [usize; 3],
        scaling: GridScaling,
    ) -> Vector3<f64> {
        let mut fractional = *grid;
        for axis in 0..3 {
            let divisions = scaling.divisions(dimensions[axis]);
            fractional[axis] = if divisions > 0.0 {
                grid[axis] / divisions
            } else {
                0.0
            };
        }
        self.to_cartesian(&fractional)
    }
}

impl std::fmt::Display for Lattice {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = String::new();
        for (name, row) in ["a", "b", "c"].iter().zip(self.matrix.row_iter()) {
            s += &f!(
                "{name}: {:>12} {:>12} {:>12}\n",
                row[0].sci(4, 2),
                row[1].sci(4, 2),
                row[2].sci(4, 2)
            );
        }
        write!(f, "{}", s.trim_end())
    }
}

/// Inverse of a 3x3 lattice matrix via the explicit cofactor formula
///
/// ```text
/// det        = sum_i M[0][i] * (M[1][i+1] * M[2][i+2] - M[1][i+2] * M[2][i+1])
/// Minv[i][j] = (M[i+1][j+1] * M[i+2][j+2] - M[i+1][j+2] * M[i+2][j+1]) / det
/// ```
///
/// All indices are modulo 3. With cell vectors stored as rows this is the
/// inverse of the transposed matrix, which is exactly the map from cartesian
/// to fractional coordinates.
fn cofactor_inverse(m: &Matrix3<f64>) -> Result<(Matrix3<f64>, f64)> {
    let determinant: f64 = (0..3)
        .map(|i| {
            m[(0, i)]
                * (m[(1, (i + 1) % 3)] * m[(2, (i + 2) % 3)]
                    - m[(1, (i + 2) % 3)] * m[(2, (i + 1) % 3)])
        })
        .sum();

    // compare against the size of the cell so tiny and huge units behave alike
    let scale: f64 = m.row_iter().map(|row| row.norm()).product();
    if !determinant.is_finite()
        || scale == 0.0
        || (determinant / scale).is_negligible(DETERMINANT_TOLERANCE)
    {
        return Err(Error::DegenerateGeometry { determinant });
    }

    let inverse = Matrix3::from_fn(|i, j| {
        (m[((i + 1) % 3, (j + 1) % 3)] * m[((i + 2) % 3, (j + 2) % 3)]
            - m[((i + 1) % 3, (j + 2) % 3)] * m[((i + 2) % 3, (j + 1) % 3)])
            / determinant
    });

    Ok((inverse, determinant))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn hexagonal() -> Lattice {
        Lattice::new([
            [2.5, 0.0, 0.0],
            [-1.25, 2.1650635, 0.0],
            [0.0, 0.0, 4.0],
        ])
        .unwrap()
    }

    #[test]
    fn identity_inverse() {
        let lattice = Lattice::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]).unwrap();
        assert_eq!(lattice.inverse(), &Matrix3::identity());
        assert_eq!(lattice.determinant(), 1.0);
    }

    #[test]
    fn cofactor_matches_transposed_inverse() {
        let lattice = hexagonal();
        let expected = lattice.matrix().transpose().try_inverse().unwrap();
        assert_relative_eq!(*lattice.inverse(), expected, epsilon = 1.0e-12);
        assert_relative_eq!(lattice.volume(), 2.5 * 2.1650635 * 4.0, epsilon = 1.0e-9);
    }

    #[test]
    fn fractional_round_trip() {
        let lattice = hexagonal();
        let fractional = Vector3::new(0.25, 0.6, 0.9);
        let point = lattice.to_cartesian(&fractional);
        assert_relative_eq!(lattice.to_fractional(&point), fractional, epsilon = 1.0e-12);

        // far corner is a+b+c
        let corner = lattice.to_cartesian(&Vector3::new(1.0, 1.0, 1.0));
        for axis in 0..3 {
            assert_relative_eq!(corner[axis], lattice.max_extent(axis), epsilon = 1.0e-12);
        }
    }

    #[test]
    fn grid_scaling_conventions() {
        let lattice = Lattice::new([[3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 3.0]]).unwrap();
        let far = Vector3::new(3.0, 3.0, 3.0);

        let node = lattice.to_grid(&far, [4, 4, 4], GridScaling::NodeExact);
        assert_relative_eq!(node, Vector3::new(3.0, 3.0, 3.0), epsilon = 1.0e-12);

        let periodic = lattice.to_grid(&far, [4, 4, 4], GridScaling::Periodic);
        assert_relative_eq!(periodic, Vector3::new(4.0, 4.0, 4.0), epsilon = 1.0e-12);

        let back = lattice.to_real(&node, [4, 4, 4], GridScaling::NodeExact);
        assert_relative_eq!(back, far, epsilon = 1.0e-12);
    }

    #[test]
    fn single_sample_axis() {
        let lattice = Lattice::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]).unwrap();
        let point = lattice.to_real(&Vector3::new(0.0, 0.0, 0.0), [1, 1, 1], GridScaling::NodeExact);
        assert_eq!(point, Vector3::zeros());
    }

    #[test]
    fn degenerate_lattice() {
        // c is a linear combination of a and b
        let result = Lattice::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]]);
        assert!(matches!(result, Err(Error::DegenerateGeometry { .. })));

        let result = Lattice::new([[0.0; 3]; 3]);
        assert!(matches!(result, Err(Error::DegenerateGeometry { .. })));
    }
}

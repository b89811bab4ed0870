//! Module for the scalar field data and implementations

// crate modules
use crate::error::{Error, Result, Warning};
use crate::lattice::{GridScaling, Lattice};

// chgtools modules
use chgtools_utils::{f, FloatExt, SliceExt};

// external crates
use nalgebra::Vector3;

/// Volumetric density grid tied to a crystal lattice
///
/// All parsed CHGCAR files are stored as a [ScalarField]. The field is
/// immutable once constructed, so a single instance can be shared between any
/// number of slice requests, including across threads.
///
/// ## Grid layout
///
/// Values are stored in one flat buffer with x varying fastest and z slowest,
/// exactly as they appear in the file.
///
/// ```text
/// index = k*nx*ny + j*nx + i
/// ```
///
/// The buffer always holds `nx*ny*nz` values. Files that run short are left
/// padded with zeros and a [Warning] is recorded (see
/// [warnings()](ScalarField::warnings)).
///
/// ## Examples
///
/// Fields are usually read from a file with [load_field](crate::load_field),
/// but synthetic fields are handy for testing.
///
/// ```rust
/// # use chgtools_field::{Lattice, ScalarField};
/// let lattice = Lattice::new([
///     [1.0, 0.0, 0.0],
///     [0.0, 1.0, 0.0],
///     [0.0, 0.0, 1.0],
/// ]).unwrap();
///
/// // 2x2x2 grid of zeros with a single value in the far corner
/// let mut values = vec![0.0; 8];
/// values[7] = 1.0;
///
/// let field = ScalarField::new(lattice, [2, 2, 2], values).unwrap();
/// assert_eq!(field.get_value(1, 1, 1).unwrap(), 1.0);
/// assert!(field.get_value(2, 0, 0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    /// First line of the file
    pub(crate) comment: String,
    /// Universal scaling factor from the second line
    pub(crate) scalar: f64,
    /// Unit cell, already scaled
    pub(crate) lattice: Lattice,
    /// Element symbols, only present for VASP5 style headers
    pub(crate) species_names: Vec<String>,
    /// Number of atoms of each species
    pub(crate) species_counts: Vec<usize>,
    /// Number of grid points (nx, ny, nz)
    pub(crate) dimensions: [usize; 3],
    /// Flat buffer of nx*ny*nz samples
    pub(crate) values: Vec<f64>,
    /// Grid index convention used for sampling
    pub(crate) scaling: GridScaling,
    /// Line number where a second data channel starts, if any
    pub(crate) second_channel: Option<usize>,
    /// Recoverable issues found while reading
    pub(crate) warnings: Vec<Warning>,
}

impl ScalarField {
    /// Create a field directly from a lattice and grid values
    ///
    /// The values must be in file order (x fastest) and there must be exactly
    /// `nx*ny*nz` of them.
    pub fn new(lattice: Lattice, dimensions: [usize; 3], values: Vec<f64>) -> Result<Self> {
        let expected = dimensions.iter().product();
        if values.len() != expected {
            return Err(Error::UnexpectedNumberOfValues {
                expected,
                found: values.len(),
            });
        }

        Ok(Self {
            comment: String::new(),
            scalar: 1.0,
            lattice,
            species_names: Vec::new(),
            species_counts: Vec::new(),
            dimensions,
            values,
            scaling: GridScaling::default(),
            second_channel: None,
            warnings: Vec::new(),
        })
    }

    /// Change the grid index convention used for sampling
    pub fn with_scaling(mut self, scaling: GridScaling) -> Self {
        self.scaling = scaling;
        self
    }

    /// Value stored at grid index (i, j, k)
    ///
    /// Fails with [Error::OutOfBounds] if any index is outside of the grid.
    /// Indices are never clamped.
    pub fn get_value(&self, i: usize, j: usize, k: usize) -> Result<f64> {
        let [nx, ny, nz] = self.dimensions;
        if i >= nx || j >= ny || k >= nz {
            return Err(Error::OutOfBounds {
                index: [i, j, k],
                dimensions: self.dimensions,
            });
        }
        Ok(self.values[k * nx * ny + j * nx + i])
    }

    /// Convert a real-space point to continuous grid-index space
    pub fn to_grid(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.lattice.to_grid(point, self.dimensions, self.scaling)
    }

    /// Convert a continuous grid-index coordinate to a real-space point
    pub fn to_real(&self, grid: &Vector3<f64>) -> Vector3<f64> {
        self.lattice.to_real(grid, self.dimensions, self.scaling)
    }
}

/// Accessors
impl ScalarField {
    /// Comment from the first line of the file
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Universal scaling factor applied to the lattice vectors
    pub fn scalar(&self) -> f64 {
        self.scalar
    }

    /// Unit cell of the grid
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Element symbols, empty for VASP4 style headers
    pub fn species_names(&self) -> &[String] {
        &self.species_names
    }

    /// Number of atoms of each species
    pub fn species_counts(&self) -> &[usize] {
        &self.species_counts
    }

    /// Total number of atoms in the cell
    pub fn n_atoms(&self) -> usize {
        self.species_counts.iter().sum()
    }

    /// Number of grid points (nx, ny, nz)
    pub fn dimensions(&self) -> [usize; 3] {
        self.dimensions
    }

    /// Flat buffer of every grid value, x varying fastest
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Grid index convention used for sampling
    pub fn scaling(&self) -> GridScaling {
        self.scaling
    }

    /// Volume of the unit cell
    pub fn cell_volume(&self) -> f64 {
        self.lattice.volume()
    }

    /// Maximum real-space extent of the cell along a cartesian axis
    pub fn max_extent(&self, axis: usize) -> f64 {
        self.lattice.max_extent(axis)
    }

    /// True if the file contains a second data channel (e.g. spin density)
    pub fn has_second_channel(&self) -> bool {
        self.second_channel.is_some()
    }

    /// Line number at which the second data channel starts, if any
    pub fn second_channel_line(&self) -> Option<usize> {
        self.second_channel
    }

    /// Recoverable issues found while reading the file
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Smallest and largest grid values
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values.finite_range().ok()
    }
}

impl std::fmt::Display for ScalarField {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let [nx, ny, nz] = self.dimensions;
        let head = f!(" > Scalar field [{nx}x{ny}x{nz}, {:?}]", self.scaling);

        let mut s = f!("{}\n{}\n{}\n", "-".repeat(40), head, "-".repeat(40));
        s += &f!("comment: {}\n", self.comment.trim());
        s += &f!("scalar : {}\n", self.scalar.sci(5, 2));
        s += &f!("lattice:\n{}\n", self.lattice);
        s += "inverse:\n";
        for row in self.lattice.inverse().row_iter() {
            s += &f!(
                "   {:>12} {:>12} {:>12}\n",
                row[0].sci(4, 2),
                row[1].sci(4, 2),
                row[2].sci(4, 2)
            );
        }
        s += &f!("volume : {}\n", self.cell_volume().sci(5, 2));

        if self.species_names.is_empty() {
            s += &f!("atoms  : {:?}\n", self.species_counts);
        } else {
            let species: Vec<String> = self
                .species_names
                .iter()
                .zip(&self.species_counts)
                .map(|(name, n)| f!("{name}{n}"))
                .collect();
            s += &f!("atoms  : {}\n", species.join(" "));
        }

        if let Some((lo, hi)) = self.value_range() {
            s += &f!("values : {} - {}\n", lo.sci(3, 2), hi.sci(3, 2));
        }
        if let Some(line) = self.second_channel {
            s += &f!("second channel starts on line {line}\n");
        }
        for warning in &self.warnings {
            s += &f!("warning: {warning}\n");
        }

        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(n: usize) -> ScalarField {
        let lattice = Lattice::new([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]]).unwrap();
        let values = (0..n * n * n).map(|v| v as f64).collect();
        ScalarField::new(lattice, [n, n, n], values).unwrap()
    }

    #[test]
    fn index_order() {
        let field = cube(3);
        assert_eq!(field.get_value(0, 0, 0).unwrap(), 0.0);
        assert_eq!(field.get_value(1, 0, 0).unwrap(), 1.0);
        assert_eq!(field.get_value(0, 1, 0).unwrap(), 3.0);
        assert_eq!(field.get_value(0, 0, 1).unwrap(), 9.0);
        assert_eq!(field.get_value(2, 2, 2).unwrap(), 26.0);
    }

    #[test]
    fn out_of_bounds() {
        let field = cube(3);
        for (i, j, k) in [(3, 0, 0), (0, 3, 0), (0, 0, 3), (9, 9, 9)] {
            match field.get_value(i, j, k) {
                Err(Error::OutOfBounds { index, dimensions }) => {
                    assert_eq!(index, [i, j, k]);
                    assert_eq!(dimensions, [3, 3, 3]);
                }
                other => panic!("expected OutOfBounds, got {other:?}"),
            }
        }
    }

    #[test]
    fn wrong_buffer_length() {
        let lattice = Lattice::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]).unwrap();
        let result = ScalarField::new(lattice, [2, 2, 2], vec![0.0; 7]);
        assert!(matches!(
            result,
            Err(Error::UnexpectedNumberOfValues {
                expected: 8,
                found: 7
            })
        ));
    }

    #[test]
    fn summary() {
        let field = cube(2);
        assert_eq!(field.value_range(), Some((0.0, 7.0)));
        assert_eq!(field.cell_volume(), 8.0);
        assert!(field.to_string().contains("Scalar field [2x2x2, NodeExact]"));
    }
}

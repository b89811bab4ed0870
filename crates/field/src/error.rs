//! Result and Error types for chgtools-field

/// Type alias for Result<T, field::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `chgtools-field` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("failed to parse {field} on line {line}: \"{content}\"")]
    FormatError {
        field: &'static str,
        line: usize,
        content: String,
    },

    #[error("lattice matrix is not invertible (determinant {determinant:e})")]
    DegenerateGeometry { determinant: f64 },

    #[error("grid index {index:?} outside of {dimensions:?} grid")]
    OutOfBounds {
        index: [usize; 3],
        dimensions: [usize; 3],
    },

    #[error("inconsistent number of grid values (expected {expected:?}, found {found:?})")]
    UnexpectedNumberOfValues { expected: usize, found: usize },
}

/// Recoverable problems found while reading a density file
///
/// These never abort a read. They are logged as they happen and kept on the
/// [ScalarField](crate::ScalarField) so the caller can decide what to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// Fewer grid values than `nx*ny*nz`, remaining cells are left as `0.0`
    IncompleteGrid { expected: usize, found: usize },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Warning::IncompleteGrid { expected, found } => write!(
                f,
                "incomplete grid, read {found} of {expected} values ({} left as zero)",
                expected.saturating_sub(*found)
            ),
        }
    }
}

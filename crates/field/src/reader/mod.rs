//! Parsers and logic for reading CHGCAR files
//!
//! All functions are re-exported to the crate root for easy access.
//!
//! # Quickstart
//!
//! The simplest way to read a density grid is the convenience function:
//!
//! ```rust, no_run
//! # use chgtools_field::{load_field, ScalarField};
//! let field: ScalarField = load_field("/path/to/CHGCAR").unwrap();
//! ```
//!
//! Under the hood this initialises a [FieldReader]. This is made public for
//! finer control, for example to show a progress bar or change the grid
//! convention.
//!
//! ```rust, no_run
//! # use chgtools_field::{reader::FieldReader, GridScaling};
//! # use std::path::Path;
//! let mut reader = FieldReader::new();
//! reader.set_scaling(GridScaling::Periodic);
//!
//! let path = Path::new("/path/to/CHGCAR");
//! let field = reader.parse(path).unwrap();
//! ```
//!
//! # Formatting notes
//!
//! **Headers are strict**
//!
//! > Anything wrong with the scaling factor, lattice, species counts, or grid
//! > dimensions is a fatal [FormatError](crate::Error::FormatError).
//!
//! **Grid values are lenient**
//!
//! > Values are pulled out of each line with
//! > [numeric_tokens](parsers::numeric_tokens). Run-on numbers such as
//! > `1.0E+00-2.0E+00` are split and junk is skipped.
//!
//! > A grid that runs short is kept, padded with zeros, and the shortfall is
//! > recorded as a [Warning](crate::Warning) on the field.
//!
//! **Only the first channel is read**
//!
//! > Spin-polarised files repeat the grid dimension line and write a second
//! > grid (the magnetisation density). The line on which it starts is recorded
//! > but the values are not read.

// reader modules
mod chgcar;
pub mod parsers;

// re-exports for clean API + documentation
#[doc(inline)]
pub use chgcar::FieldReader;

// library imports
use crate::error::Result;
use crate::ScalarField;
use std::path::Path;

/// Read the density grid from a CHGCAR file
///
/// Returns a result containing the [ScalarField] extracted from the file at
/// `path`, using the default [NodeExact](crate::GridScaling::NodeExact)
/// convention and no progress bar.
///
/// - `path` - Path to the CHGCAR file, can be [&str], [String], [Path], etc...
///
/// Example
/// ```rust, no_run
/// # use chgtools_field::{load_field, ScalarField};
/// let field: ScalarField = load_field("path/to/CHGCAR").unwrap();
/// for warning in field.warnings() {
///     println!("{warning}");
/// }
/// ```
pub fn load_field<P: AsRef<Path>>(path: P) -> Result<ScalarField> {
    let path: &Path = Path::new(path.as_ref());
    let mut reader = FieldReader::new();
    reader.disable_progress();
    reader.parse(path)
}

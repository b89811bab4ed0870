//! Volumetric density grids and trilinear sampling
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod field;
mod lattice;
mod sampler;

pub mod reader;

// inline the important field-related modules for a nice public API
#[doc(inline)]
pub use reader::{load_field, FieldReader};

#[doc(inline)]
pub use field::ScalarField;

#[doc(inline)]
pub use lattice::{GridScaling, Lattice};

#[doc(inline)]
pub use sampler::{is_out_of_domain, OUT_OF_DOMAIN};

#[doc(inline)]
pub use error::{Error, Result, Warning};

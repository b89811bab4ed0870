//! Planar slices, isolines, and palettes for density grids
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod isolines;
mod palette;
mod plane;
mod remap;
mod request;

#[doc(inline)]
pub use plane::{slice, PlaneSlice};

#[doc(inline)]
pub use request::{SliceRequest, SliceRequestBuilder};

#[doc(inline)]
pub use isolines::{isolines, thresholds, MAX_ISOLINE_BINS};

#[doc(inline)]
pub use palette::{Palette, Rgb};

#[doc(inline)]
pub use remap::{
    level_threshold, remap, ISOLINE_LOG_BOUNDARY, LINEAR_BAND_SCALE, SIGNED_LOG_THRESHOLD,
};

#[doc(inline)]
pub use error::{Error, Result};

//! Rendering of density slices to PNG images
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod canvas;
mod error;
mod render;

#[doc(inline)]
pub use canvas::Canvas;

#[doc(inline)]
pub use render::{
    frame_path, render_request, render_slice, write_series, PaletteKind, PlotOptions,
};

#[doc(inline)]
pub use error::{Error, Result};

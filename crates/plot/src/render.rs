//! Turning slices into images

// crate modules
use crate::canvas::Canvas;
use crate::error::{Error, Result};

// chgtools modules
use chgtools_field::{is_out_of_domain, ScalarField};
use chgtools_slice::{isolines, slice, Palette, PlaneSlice, Rgb, SliceRequest};
use chgtools_utils::f;

// standard library
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

// external crates
use clap::ValueEnum;
use log::{debug, info};
use rayon::prelude::*;

/// Choice of built-in palette
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PaletteKind {
    /// Pale yellow to dark blue, suited to densities
    #[default]
    Sequential,
    /// Blue to white to red, suited to density differences
    Diverging,
}

impl PaletteKind {
    /// Build the palette over `[low, high]`
    pub fn palette(&self, low: f64, high: f64) -> Result<Palette> {
        let palette = match self {
            PaletteKind::Sequential => Palette::sequential(low, high)?,
            PaletteKind::Diverging => Palette::diverging(low, high)?,
        };
        Ok(palette)
    }
}

/// Display options shared by every image
///
/// `low` and `high` are in display space, so for densities `-3.0` to `3.0`
/// covers `1e-3` to `1e3`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    /// Bottom of the palette domain
    pub low: f64,
    /// Top of the palette domain
    pub high: f64,
    /// Number of isoline levels between low and high, 0 for none
    pub isolines: usize,
    /// Built-in palette
    pub palette: PaletteKind,
    /// Trim the blank margin outside of the cell
    pub crop: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            low: -5.0,
            high: 5.0,
            isolines: 0,
            palette: PaletteKind::Sequential,
            crop: true,
        }
    }
}

/// Colour every pixel of a slice
///
/// Pixel (i, j) of the slice is drawn at column i, row j of the canvas.
/// Pixels outside of the cell and isoline markers are drawn black.
pub fn render_slice(
    plane: &PlaneSlice,
    palette: &Palette,
    markers: &BTreeSet<(usize, usize)>,
) -> Result<Canvas> {
    let mut canvas = Canvas::new(to_u32(plane.ix())?, to_u32(plane.iy())?)?;

    for j in 0..plane.iy() {
        for i in 0..plane.ix() {
            let (Some(raw), Some(display)) = (plane.get(i, j), plane.get_display(i, j)) else {
                continue;
            };

            let colour = if is_out_of_domain(raw) || markers.contains(&(i, j)) {
                Rgb::BLACK
            } else {
                palette.get_color(display)
            };
            canvas.set_pixel(to_u32(i)?, to_u32(j)?, colour);
        }
    }

    Ok(canvas)
}

/// Pixel index as a PNG dimension
fn to_u32(n: usize) -> Result<u32> {
    u32::try_from(n)
        .map_err(|_| Error::InvalidArgument(f!("{n} px does not fit in a PNG dimension")))
}

/// Full pipeline from a field to an image
///
/// Samples the plane, optionally crops it, finds the isolines and colours the
/// result.
pub fn render_request(
    field: &ScalarField,
    request: &SliceRequest,
    options: &PlotOptions,
) -> Result<Canvas> {
    let mut plane = slice(field, request)?;
    if options.crop {
        plane.crop();
    }

    if plane.is_empty() {
        return Err(Error::InvalidArgument(f!(
            "nothing to draw, plane through {:?} misses the cell",
            request.origin.as_slice()
        )));
    }

    if let Some((low, high)) = plane.display_range() {
        debug!("Display values {low:.3} to {high:.3}");
    }

    let palette = options.palette.palette(options.low, options.high)?;
    let markers = match options.isolines {
        0 => BTreeSet::new(),
        n => isolines(
            &plane,
            n,
            options.low,
            options.high,
            request.allow_negative,
        ),
    };

    render_slice(&plane, &palette, &markers)
}

/// Render a stack of parallel planes to numbered PNG files
///
/// Frame `k` is the requested plane moved `k * step` along the plane normal.
/// The field is shared read-only between frames, which are rendered in
/// parallel.
///
/// Files are named from `output` with the frame number appended to the stem,
/// e.g. `slice.png` becomes `slice_000.png`, `slice_001.png`, etc...
pub fn write_series(
    field: &ScalarField,
    request: &SliceRequest,
    options: &PlotOptions,
    frames: usize,
    step: f64,
    output: &Path,
) -> Result<Vec<PathBuf>> {
    info!("Rendering {frames} frames, {step} apart");

    let paths = (0..frames)
        .into_par_iter()
        .map(|k| -> Result<PathBuf> {
            let shifted = request.shifted(k as f64 * step)?;
            let path = frame_path(output, k);
            render_request(field, &shifted, options)?.write_png(&path)?;
            Ok(path)
        })
        .collect::<Result<Vec<PathBuf>>>()?;

    info!("Wrote {} frames", paths.len());
    Ok(paths)
}

/// Output path for frame `k` of a series
pub fn frame_path(output: &Path, k: usize) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "slice".to_string());
    output.with_file_name(f!("{stem}_{k:03}.png"))
}

//! Module for sampling a plane through a scalar field

// crate modules
use crate::error::{Error, Result};
use crate::remap::remap;
use crate::request::SliceRequest;

// chgtools modules
use chgtools_field::{is_out_of_domain, ScalarField};
use chgtools_utils::{f, SliceExt};

// external crates
use itertools::iproduct;
use log::{debug, info};
use nalgebra::Vector3;

/// Sample a plane through a field
///
/// Every pixel of the image described by the [SliceRequest] is sampled with
/// trilinear interpolation, and the raw values are remapped onto the display
/// scale.
///
/// Pixels that fall outside of the unit cell hold the
/// [OUT_OF_DOMAIN](chgtools_field::OUT_OF_DOMAIN) sentinel in the raw buffer.
/// Call [crop()](PlaneSlice::crop) to trim the blank margin these leave.
///
/// ```rust
/// # use chgtools_field::{Lattice, ScalarField};
/// # use chgtools_slice::{slice, SliceRequest};
/// let lattice = Lattice::new([
///     [1.0, 0.0, 0.0],
///     [0.0, 1.0, 0.0],
///     [0.0, 0.0, 1.0],
/// ]).unwrap();
/// let field = ScalarField::new(lattice, [2, 2, 2], vec![1.0; 8]).unwrap();
///
/// // 20x20 px centred on the middle of the cell, twice the width of the cell
/// let request = SliceRequest::builder()
///     .origin([0.5, 0.5, 0.5])
///     .scale(10.0)
///     .bounds([-1.0, 1.0, -1.0, 1.0])
///     .build();
///
/// let mut plane = slice(&field, &request).unwrap();
/// assert_eq!((plane.ix(), plane.iy()), (20, 20));
///
/// // only the 11x11 px inside of the cell survive
/// plane.crop();
/// assert_eq!((plane.ix(), plane.iy()), (11, 11));
/// ```
pub fn slice(field: &ScalarField, request: &SliceRequest) -> Result<PlaneSlice> {
    PlaneSlice::extract(field, request)
}

/// Raw and display values over a 2D pixel grid
///
/// Both buffers are stored row by row, so pixel (i, j) is at index `j*ix + i`.
///
/// The slice keeps the request it was made from, along with the offset of the
/// current window into the original image, so that any pixel can be traced back
/// to the real-space point it was sampled at after cropping.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneSlice {
    /// Number of pixels along v1
    ix: usize,
    /// Number of pixels along v2
    iy: usize,
    /// Sampled physical values
    raw: Vec<f64>,
    /// Remapped values for colouring
    display: Vec<f64>,
    /// Geometry and remap options
    request: SliceRequest,
    /// Size of the image before any cropping
    full: [usize; 2],
    /// Pixel offset of this window into the full image
    offset: [usize; 2],
}

impl PlaneSlice {
    /// Sample every pixel of the image described by the request
    pub fn extract(field: &ScalarField, request: &SliceRequest) -> Result<Self> {
        let (ix, iy) = request.pixels()?;
        debug!("Sampling {ix}x{iy} px plane through {:?}", request.origin);

        let mut raw = Vec::with_capacity(ix * iy);
        for (j, i) in iproduct!(0..iy, 0..ix) {
            let point = request.pixel_to_point(i as f64, j as f64, ix, iy);
            raw.push(field.sample(&point)?);
        }

        let outside = raw.iter().filter(|v| is_out_of_domain(**v)).count();
        info!("Sampled {ix}x{iy} px slice, {outside} px outside of the cell");

        Ok(Self::with_request(ix, iy, raw, request.clone()))
    }

    /// Wrap an existing raw buffer, e.g. from another sampler
    ///
    /// The geometry is left at the [Default] request, so only the remap option
    /// is meaningful.
    ///
    /// ```rust
    /// # use chgtools_slice::PlaneSlice;
    /// let plane = PlaneSlice::from_values(2, 1, vec![100.0, 0.5], true).unwrap();
    /// assert_eq!(plane.display(), &[2.0, 0.05]);
    /// assert!(PlaneSlice::from_values(2, 2, vec![0.0; 3], true).is_err());
    /// ```
    pub fn from_values(ix: usize, iy: usize, raw: Vec<f64>, allow_negative: bool) -> Result<Self> {
        if raw.len() != ix * iy {
            return Err(Error::InvalidRequest(f!(
                "{ix}x{iy} px slice needs {} values, found {}",
                ix * iy,
                raw.len()
            )));
        }

        let request = SliceRequest {
            allow_negative,
            ..Default::default()
        };
        Ok(Self::with_request(ix, iy, raw, request))
    }

    fn with_request(ix: usize, iy: usize, raw: Vec<f64>, request: SliceRequest) -> Self {
        let display = raw
            .iter()
            .map(|v| remap(*v, request.allow_negative))
            .collect();

        Self {
            ix,
            iy,
            raw,
            display,
            request,
            full: [ix, iy],
            offset: [0, 0],
        }
    }

    /// Trim the slice to the tight bounding box of meaningful pixels
    ///
    /// Pixels with a raw value of exactly zero, or outside of the cell, are
    /// treated as blank. Both buffers are reallocated to the smaller window.
    ///
    /// Cropping is idempotent, and a slice that is entirely blank becomes an
    /// empty 0x0 slice.
    pub fn crop(&mut self) {
        let mut window: Option<[usize; 4]> = None;
        for (j, i) in iproduct!(0..self.iy, 0..self.ix) {
            if is_blank(self.raw[j * self.ix + i]) {
                continue;
            }
            window = Some(match window {
                None => [i, i, j, j],
                Some([x0, x1, y0, y1]) => [x0.min(i), x1.max(i), y0.min(j), y1.max(j)],
            });
        }

        let Some([min_x, max_x, min_y, max_y]) = window else {
            debug!("Nothing to keep in {}x{} px slice", self.ix, self.iy);
            self.ix = 0;
            self.iy = 0;
            self.raw = Vec::new();
            self.display = Vec::new();
            return;
        };

        // half-open window so that cropping again finds the same box
        let nx = max_x + 1 - min_x;
        let ny = max_y + 1 - min_y;

        let mut raw = Vec::with_capacity(nx * ny);
        let mut display = Vec::with_capacity(nx * ny);
        for j in min_y..=max_y {
            let row = j * self.ix;
            raw.extend_from_slice(&self.raw[row + min_x..=row + max_x]);
            display.extend_from_slice(&self.display[row + min_x..=row + max_x]);
        }

        debug!(
            "Cropped {}x{} px slice to {nx}x{ny} px at ({min_x}, {min_y})",
            self.ix, self.iy
        );

        self.offset[0] += min_x;
        self.offset[1] += min_y;
        self.ix = nx;
        self.iy = ny;
        self.raw = raw;
        self.display = display;
    }

    /// Raw value at pixel (i, j)
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.index(i, j).map(|n| self.raw[n])
    }

    /// Display value at pixel (i, j)
    pub fn get_display(&self, i: usize, j: usize) -> Option<f64> {
        self.index(i, j).map(|n| self.display[n])
    }

    /// Real-space point that pixel (i, j) was sampled at
    pub fn pixel_point(&self, i: usize, j: usize) -> Vector3<f64> {
        self.request.pixel_to_point(
            (i + self.offset[0]) as f64,
            (j + self.offset[1]) as f64,
            self.full[0],
            self.full[1],
        )
    }

    /// Smallest and largest finite display values inside of the cell
    pub fn display_range(&self) -> Option<(f64, f64)> {
        let inside: Vec<f64> = self
            .raw
            .iter()
            .zip(&self.display)
            .filter(|(raw, _)| !is_out_of_domain(**raw))
            .map(|(_, display)| *display)
            .collect();
        inside.finite_range().ok()
    }

    fn index(&self, i: usize, j: usize) -> Option<usize> {
        (i < self.ix && j < self.iy).then(|| j * self.ix + i)
    }
}

/// Accessors
impl PlaneSlice {
    /// Number of pixels along v1
    pub fn ix(&self) -> usize {
        self.ix
    }

    /// Number of pixels along v2
    pub fn iy(&self) -> usize {
        self.iy
    }

    /// True for a 0x0 slice, e.g. after cropping a blank plane
    pub fn is_empty(&self) -> bool {
        self.ix == 0 || self.iy == 0
    }

    /// Flat buffer of sampled values, row by row
    pub fn raw(&self) -> &[f64] {
        &self.raw
    }

    /// Flat buffer of remapped values, row by row
    pub fn display(&self) -> &[f64] {
        &self.display
    }

    /// Request the slice was sampled from
    pub fn request(&self) -> &SliceRequest {
        &self.request
    }

    /// Whether the signed remap was used
    pub fn allow_negative(&self) -> bool {
        self.request.allow_negative
    }

    /// Pixel offset of the current window into the uncropped image
    pub fn offset(&self) -> [usize; 2] {
        self.offset
    }
}

/// Zero and the out of domain sentinel carry nothing worth drawing
fn is_blank(raw: f64) -> bool {
    raw == 0.0 || is_out_of_domain(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chgtools_field::{Lattice, OUT_OF_DOMAIN};

    fn unit_cube(value: f64) -> ScalarField {
        let lattice = Lattice::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]).unwrap();
        ScalarField::new(lattice, [2, 2, 2], vec![value; 8]).unwrap()
    }

    fn centred_request() -> SliceRequest {
        SliceRequest::builder()
            .origin([0.5, 0.5, 0.5])
            .scale(10.0)
            .bounds([-1.0, 1.0, -1.0, 1.0])
            .build()
    }

    #[test]
    fn margin_is_out_of_domain() {
        let plane = slice(&unit_cube(1.0), &centred_request()).unwrap();
        assert_eq!(plane.get(0, 0), Some(OUT_OF_DOMAIN));
        assert_eq!(plane.get(4, 10), Some(OUT_OF_DOMAIN));
        assert_relative_eq!(plane.get(5, 10).unwrap(), 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(plane.get(15, 15).unwrap(), 1.0, epsilon = 1.0e-12);
        assert_eq!(plane.get(16, 10), Some(OUT_OF_DOMAIN));
        assert_eq!(plane.get(20, 0), None);
    }

    #[test]
    fn crop_to_cell() {
        let mut plane = slice(&unit_cube(1.0), &centred_request()).unwrap();
        plane.crop();
        assert_eq!((plane.ix(), plane.iy()), (11, 11));
        assert_eq!(plane.offset(), [5, 5]);
        assert_eq!(plane.raw().len(), 121);
        assert_eq!(plane.display().len(), 121);
        assert!(plane.raw().iter().all(|v| !is_out_of_domain(*v)));

        // pixels still map back onto the points they were sampled at
        assert_relative_eq!(plane.pixel_point(0, 0), Vector3::new(0.0, 0.0, 0.5));
        assert_relative_eq!(plane.pixel_point(10, 10), Vector3::new(1.0, 1.0, 0.5));
    }

    #[test]
    fn crop_is_idempotent() {
        let mut once = slice(&unit_cube(2.0), &centred_request()).unwrap();
        once.crop();
        let mut twice = once.clone();
        twice.crop();
        assert_eq!(once, twice);
    }

    #[test]
    fn crop_keeps_interior_zeros() {
        let raw = vec![
            0.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 3.0, //
            0.0, 0.0, 0.0, 0.0, //
        ];
        let mut plane = PlaneSlice::from_values(4, 4, raw, false).unwrap();
        plane.crop();
        assert_eq!((plane.ix(), plane.iy()), (3, 2));
        assert_eq!(plane.raw(), &[1.0, 0.0, 0.0, 0.0, 0.0, 3.0]);
        assert_eq!(plane.offset(), [1, 1]);
    }

    #[test]
    fn crop_blank_slice() {
        let mut plane = slice(&unit_cube(0.0), &centred_request()).unwrap();
        plane.crop();
        assert_eq!((plane.ix(), plane.iy()), (0, 0));
        assert!(plane.is_empty());
        assert!(plane.raw().is_empty());
        assert_eq!(plane.display_range(), None);

        // and again, without panicking
        plane.crop();
        assert!(plane.is_empty());
    }

    #[test]
    fn display_range_ignores_margin() {
        let plane = slice(&unit_cube(100.0), &centred_request()).unwrap();
        let (low, high) = plane.display_range().unwrap();
        assert_relative_eq!(low, 2.0, epsilon = 1.0e-9);
        assert_relative_eq!(high, 2.0, epsilon = 1.0e-9);
    }

    #[test]
    fn invalid_request() {
        let request = SliceRequest::builder().scale(-1.0).build();
        let result = slice(&unit_cube(1.0), &request);
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }
}

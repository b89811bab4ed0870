//! Plane geometry and display options for a slice

// crate modules
use crate::error::{Error, Result};

// chgtools modules
use chgtools_utils::f;

// external crates
use nalgebra::Vector3;

/// Geometry and display options for a single plane slice
///
/// The plane passes through `origin` and is spanned by `v1` (image x) and `v2`
/// (image y). Both are expected to be unit vectors, but this is not enforced,
/// and longer vectors simply stretch the image.
///
/// `bounds` are `[li, hi, lj, hj]`, the extent of the image in real-space
/// units along `v1` and `v2`. The image is `(hi-li)*scale` by `(hj-lj)*scale`
/// pixels and is always centred on the origin.
///
/// The fields are left public for direct use, but a builder is provided for a
/// more readable chain of setters.
///
/// ```rust
/// # use chgtools_slice::SliceRequest;
/// let request = SliceRequest::builder()
///     .origin([1.0, 1.0, 2.0])
///     .v1([1.0, 0.0, 0.0])
///     .v2([0.0, 1.0, 0.0])
///     .scale(50.0)
///     .bounds([-2.0, 2.0, -1.0, 1.0])
///     .allow_negative(true)
///     .build();
///
/// assert_eq!(request.pixels().unwrap(), (200, 100));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SliceRequest {
    /// Centre of the image in real space
    pub origin: Vector3<f64>,
    /// Direction of the image x axis
    pub v1: Vector3<f64>,
    /// Direction of the image y axis
    pub v2: Vector3<f64>,
    /// Pixels per real-space length unit
    pub scale: f64,
    /// Image extent as `[li, hi, lj, hj]`
    pub bounds: [f64; 4],
    /// Use the signed remap and signed isoline levels
    pub allow_negative: bool,
}

impl Default for SliceRequest {
    fn default() -> Self {
        Self {
            origin: Vector3::zeros(),
            v1: Vector3::x(),
            v2: Vector3::y(),
            scale: 100.0,
            bounds: [-5.0, 5.0, -5.0, 5.0],
            allow_negative: false,
        }
    }
}

impl SliceRequest {
    /// Start a new [SliceRequestBuilder] with default parameters
    pub fn builder() -> SliceRequestBuilder {
        SliceRequestBuilder::default()
    }

    /// Image size in pixels, `(ix, iy)`
    ///
    /// Fails if the scale is not a positive finite number, if either pair of
    /// bounds is inverted, or if the image is too large to hold in memory.
    pub fn pixels(&self) -> Result<(usize, usize)> {
        self.validate()?;
        let [li, hi, lj, hj] = self.bounds;
        let ix = Self::pixel_count((hi - li) * self.scale)?;
        let iy = Self::pixel_count((hj - lj) * self.scale)?;

        // both buffers must be addressable as f64
        ix.checked_mul(iy)
            .filter(|n| *n <= isize::MAX as usize / std::mem::size_of::<f64>())
            .ok_or_else(|| Error::InvalidRequest(f!("{ix}x{iy} px image is too large")))?;

        Ok((ix, iy))
    }

    /// Real-space point under pixel (i, j)
    ///
    /// ```text
    /// point = origin + v1*(i - ix/2)/scale + v2*(j - iy/2)/scale
    /// ```
    pub fn pixel_to_point(&self, i: f64, j: f64, ix: usize, iy: usize) -> Vector3<f64> {
        let a = (i - ix as f64 / 2.0) / self.scale;
        let b = (j - iy as f64 / 2.0) / self.scale;
        self.origin + self.v1 * a + self.v2 * b
    }

    /// Normal of the plane, `v1 x v2`
    pub fn normal(&self) -> Vector3<f64> {
        self.v1.cross(&self.v2)
    }

    /// Same plane shifted by `distance` along the unit normal
    ///
    /// Useful for rendering a stack of parallel slices through a cell.
    pub fn shifted(&self, distance: f64) -> Result<Self> {
        let normal = self.normal();
        let length = normal.norm();
        if !length.is_normal() {
            return Err(Error::InvalidRequest(
                "plane vectors are parallel, no normal to shift along".to_string(),
            ));
        }

        let mut request = self.clone();
        request.origin += normal * (distance / length);
        Ok(request)
    }

    fn pixel_count(length: f64) -> Result<usize> {
        let n = length.round();
        if !n.is_finite() || n >= usize::MAX as f64 {
            return Err(Error::InvalidRequest(f!(
                "{length:e} px along one side is too large"
            )));
        }
        Ok(n as usize)
    }

    fn validate(&self) -> Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(Error::InvalidRequest(f!(
                "scale must be positive, found {}",
                self.scale
            )));
        }

        let [li, hi, lj, hj] = self.bounds;
        if self.bounds.iter().any(|b| !b.is_finite()) || hi < li || hj < lj {
            return Err(Error::InvalidRequest(f!(
                "bounds must be finite and ordered as [li, hi, lj, hj], found {:?}",
                self.bounds
            )));
        }

        Ok(())
    }
}

/// Builder implementation for [SliceRequest]
///
/// Any number of parameters can be set this way (including none), and
/// anything left unset keeps the [Default] value.
///
/// To get the final [SliceRequest] from the builder, call
/// [build()](SliceRequestBuilder::build). Nothing is checked until the request
/// is used.
#[derive(Debug, Default)]
pub struct SliceRequestBuilder {
    request: SliceRequest,
}

impl SliceRequestBuilder {
    /// Create a new instance of the builder with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the [SliceRequest]
    pub fn build(self) -> SliceRequest {
        self.request
    }

    /// Centre of the image in real space
    pub fn origin(mut self, origin: [f64; 3]) -> Self {
        self.request.origin = Vector3::from(origin);
        self
    }

    /// Direction of the image x axis, ideally a unit vector
    pub fn v1(mut self, v1: [f64; 3]) -> Self {
        self.request.v1 = Vector3::from(v1);
        self
    }

    /// Direction of the image y axis, ideally a unit vector
    pub fn v2(mut self, v2: [f64; 3]) -> Self {
        self.request.v2 = Vector3::from(v2);
        self
    }

    /// Pixels per real-space length unit
    pub fn scale(mut self, scale: f64) -> Self {
        self.request.scale = scale;
        self
    }

    /// Image extent as `[li, hi, lj, hj]` along v1 and v2
    pub fn bounds(mut self, bounds: [f64; 4]) -> Self {
        self.request.bounds = bounds;
        self
    }

    /// Use the signed remap for fields that may be negative
    pub fn allow_negative(mut self, allow_negative: bool) -> Self {
        self.request.allow_negative = allow_negative;
        self
    }
}

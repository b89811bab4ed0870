//! Colour palettes for mapping display values to RGB

// crate modules
use crate::error::{Error, Result};

// chgtools modules
use chgtools_utils::f;

/// ColorBrewer RdBu, reversed to run from blue (low) to red (high)
const DIVERGING: [&str; 11] = [
    "#053061", "#2166ac", "#4393c3", "#92c5de", "#d1e5f0", "#f7f7f7", "#fddbc7", "#f4a582",
    "#d6604d", "#b2182b", "#67001f",
];

/// ColorBrewer YlGnBu, from pale yellow (low) to dark blue (high)
const SEQUENTIAL: [&str; 9] = [
    "#ffffd9", "#edf8b1", "#c7e9b4", "#7fcdbb", "#41b6c4", "#1d91c0", "#225ea8", "#253494",
    "#081d58",
];

/// A single 8-bit RGB colour
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Pure black, used for markers and anything outside of the cell
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Colour from individual channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Colour from a `#rrggbb` hex string, the `#` is optional
    ///
    /// ```rust
    /// # use chgtools_slice::Rgb;
    /// assert_eq!(Rgb::from_hex("#ff8000").unwrap(), Rgb::new(255, 128, 0));
    /// assert_eq!(Rgb::from_hex("0A0b0C").unwrap(), Rgb::new(10, 11, 12));
    /// assert!(Rgb::from_hex("#fff").is_err());
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidPalette(f!("\"{hex}\" is not a #rrggbb colour")));
        }

        let channel = |n: usize| {
            u8::from_str_radix(&digits[n..n + 2], 16)
                .map_err(|_| Error::InvalidPalette(f!("\"{hex}\" is not a #rrggbb colour")))
        };

        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// Channels as a tuple
    pub fn as_tuple(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

/// Linear colour interpolation over evenly spaced anchors
///
/// The domain `[low, high]` is split into `n-1` equal bins between the `n`
/// anchor colours. Values are clamped to the domain, so anything at or beyond
/// either end gets the first or last anchor exactly. `NaN` is treated as below
/// the domain.
///
/// ```rust
/// # use chgtools_slice::{Palette, Rgb};
/// let palette = Palette::from_hex(&["#000000", "#ffffff"], 0.0, 1.0).unwrap();
/// assert_eq!(palette.get_color(-1.0), Rgb::new(0, 0, 0));
/// assert_eq!(palette.get_color(0.5), Rgb::new(128, 128, 128));
/// assert_eq!(palette.color_for(7.0), (255, 255, 255));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    anchors: Vec<Rgb>,
    low: f64,
    high: f64,
}

impl Palette {
    /// Palette from any number (>=2) of anchor colours over `[low, high]`
    pub fn new(anchors: Vec<Rgb>, low: f64, high: f64) -> Result<Self> {
        if anchors.len() < 2 {
            return Err(Error::InvalidPalette(f!(
                "at least 2 anchor colours needed, found {}",
                anchors.len()
            )));
        }

        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(Error::InvalidPalette(f!(
                "domain must be finite with low < high, found [{low}, {high}]"
            )));
        }

        Ok(Self { anchors, low, high })
    }

    /// Palette from a list of `#rrggbb` hex strings
    pub fn from_hex(hex: &[&str], low: f64, high: f64) -> Result<Self> {
        let anchors = hex
            .iter()
            .map(|h| Rgb::from_hex(h))
            .collect::<Result<Vec<Rgb>>>()?;
        Self::new(anchors, low, high)
    }

    /// Blue to white to red, for fields with both signs
    pub fn diverging(low: f64, high: f64) -> Result<Self> {
        Self::from_hex(&DIVERGING, low, high)
    }

    /// Pale yellow to dark blue, for densities
    pub fn sequential(low: f64, high: f64) -> Result<Self> {
        Self::from_hex(&SEQUENTIAL, low, high)
    }

    /// Interpolated colour for a display value
    pub fn get_color(&self, value: f64) -> Rgb {
        let n = self.anchors.len();
        if value.is_nan() || value <= self.low {
            return self.anchors[0];
        }
        if value >= self.high {
            return self.anchors[n - 1];
        }

        let width = (self.high - self.low) / (n - 1) as f64;
        let position = (value - self.low) / width;
        let bin = (position.floor() as usize).min(n - 2);
        let fraction = (position - bin as f64).clamp(0.0, 1.0);

        let (a, b) = (self.anchors[bin], self.anchors[bin + 1]);
        Rgb {
            r: lerp(a.r, b.r, fraction),
            g: lerp(a.g, b.g, fraction),
            b: lerp(a.b, b.b, fraction),
        }
    }

    /// Interpolated colour for a display value, as `(r, g, b)`
    pub fn color_for(&self, value: f64) -> (u8, u8, u8) {
        self.get_color(value).as_tuple()
    }

    /// Anchor colours from low to high
    pub fn anchors(&self) -> &[Rgb] {
        &self.anchors
    }

    /// Bottom of the domain
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Top of the domain
    pub fn high(&self) -> f64 {
        self.high
    }
}

/// Linear interpolation of a single channel, rounded to the nearest level
fn lerp(a: u8, b: u8, fraction: f64) -> u8 {
    let (a, b) = (a as f64, b as f64);
    (a + (b - a) * fraction).round().clamp(0.0, 255.0) as u8
}

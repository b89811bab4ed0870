//! Minimal RGB raster with PNG output

// crate modules
use crate::error::{Error, Result};

// chgtools modules
use chgtools_slice::Rgb;
use chgtools_utils::f;

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// external crates
use log::debug;

/// An 8-bit RGB image held in memory
///
/// Pixel (x, y) is at row `y` from the top of the image, column `x` from the
/// left. Anything drawn outside of the canvas is silently clipped.
///
/// ```rust
/// # use chgtools_plot::Canvas;
/// # use chgtools_slice::Rgb;
/// let mut canvas = Canvas::new(4, 2).unwrap();
/// canvas.fill(Rgb::new(255, 255, 255));
/// canvas.set_pixel(1, 1, Rgb::BLACK);
///
/// assert_eq!(canvas.get_pixel(1, 1), Some(Rgb::BLACK));
/// assert_eq!(canvas.get_pixel(4, 0), None);
///
/// let mut bytes = Vec::new();
/// canvas.encode_png(&mut bytes).unwrap();
/// assert_eq!(&bytes[1..4], b"PNG");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl Canvas {
    /// Create a black canvas
    ///
    /// Fails for zero-sized images, which can not be encoded.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidArgument(f!(
                "image must be at least 1x1 px, found {width}x{height} px"
            )));
        }

        Ok(Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width as usize * height as usize],
        })
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Set every pixel to the same colour
    pub fn fill(&mut self, colour: Rgb) {
        self.pixels.fill(colour);
    }

    /// Colour a single pixel
    pub fn set_pixel(&mut self, x: u32, y: u32, colour: Rgb) {
        if let Some(n) = self.index(x, y) {
            self.pixels[n] = colour;
        }
    }

    /// Colour of a single pixel
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        self.index(x, y).map(|n| self.pixels[n])
    }

    /// Fill a `width` x `height` block with its top left corner at (x, y)
    pub fn draw_filled_rectangle(&mut self, x: u32, y: u32, width: u32, height: u32, colour: Rgb) {
        for row in y..y.saturating_add(height).min(self.height) {
            for column in x..x.saturating_add(width).min(self.width) {
                self.set_pixel(column, row, colour);
            }
        }
    }

    /// Raw `[r, g, b, r, g, b, ...]` bytes, row by row
    pub fn to_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| [p.r, p.g, p.b]).collect()
    }

    /// Encode the image as an 8-bit RGB PNG
    pub fn encode_png<W: Write>(&self, writer: W) -> Result<()> {
        let mut encoder = png::Encoder::new(writer, self.width, self.height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.to_bytes())?;
        writer.finish()?;
        Ok(())
    }

    /// Write the image to a PNG file
    pub fn write_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.encode_png(BufWriter::new(file))?;
        debug!(
            "Wrote {}x{} px image to {}",
            self.width,
            self.height,
            path.display()
        );
        Ok(())
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }
}

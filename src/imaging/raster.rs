//! Flat row-major RGB pixel buffer.
//!
//! The projector never touches `image::RgbImage` directly: it reads a source
//! [`Raster`] and fills an output [`Raster`]. Conversion to and from the
//! `image` crate's buffer type happens at the backend boundary only.

use super::projector::ProjectionError;
use image::RgbImage;

/// One opaque 8-bit RGB pixel.
pub type Rgb = [u8; 3];

/// Fill color for output pixels whose source lookup falls outside the image.
pub const BLACK: Rgb = [0, 0, 0];

/// A 2D grid of RGB triples stored row by row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl Raster {
    /// A `width × height` raster with every pixel black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![BLACK; width as usize * height as usize],
        }
    }

    /// Build a raster by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgb) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Wrap an existing row-major pixel vector.
    ///
    /// Fails if `pixels.len()` is not exactly `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgb>) -> Result<Self, ProjectionError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(ProjectionError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pixel at column `x`, row `y`. Panics when out of range, like slice indexing.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Rgb {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }

    /// Copy into an `image::RgbImage` for encoding.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| image::Rgb(self.get(x, y)))
    }
}

impl From<&RgbImage> for Raster {
    fn from(img: &RgbImage) -> Self {
        let pixels = img.pixels().map(|p| p.0).collect();
        Self {
            width: img.width(),
            height: img.height(),
            pixels,
        }
    }
}

impl From<RgbImage> for Raster {
    fn from(img: RgbImage) -> Self {
        Self::from(&img)
    }
}

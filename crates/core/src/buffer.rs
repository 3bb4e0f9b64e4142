//! Fixed-size RGBA pixel buffer produced for each body part.
//!
//! Pixels are stored row-major with row 0 at the top. Alongside the pixels a
//! buffer carries a normalized pivot (fraction of width/height, not pixel
//! coordinates) and a pixels-per-unit factor; both are consumed only by the
//! placement layer.

use glam::DVec2;

use crate::color::Rgba;
use crate::error::SpriteError;

/// Pixels per world unit used when nothing else is configured.
pub const DEFAULT_PIXELS_PER_UNIT: f64 = 100.0;

/// Width × height grid of RGBA samples in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
    pivot: DVec2,
    pixels_per_unit: f64,
}

impl PixelBuffer {
    /// Creates a fully transparent buffer with a centered pivot.
    ///
    /// Returns `SpriteError::InvalidDimension` if either dimension is zero or
    /// if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, SpriteError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; len],
            pivot: DVec2::splat(0.5),
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
        })
    }

    /// Builds a buffer from pre-computed row-major pixels.
    ///
    /// Channels are clamped to [0, 1].
    pub fn from_pixels(
        width: usize,
        height: usize,
        pixels: Vec<Rgba>,
    ) -> Result<Self, SpriteError> {
        let len = checked_len(width, height)?;
        if pixels.len() != len {
            return Err(SpriteError::InvalidDimension { width, height });
        }
        let pixels = pixels.into_iter().map(clamp_unit).collect();
        Ok(Self {
            width,
            height,
            pixels,
            pivot: DVec2::splat(0.5),
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only row-major pixels.
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Normalized anchor point, `(0.5, 0.5)` being the center.
    pub fn pivot(&self) -> DVec2 {
        self.pivot
    }

    pub fn pixels_per_unit(&self) -> f64 {
        self.pixels_per_unit
    }

    /// Replaces the pivot. Each component is clamped to [0, 1].
    pub fn with_pivot(mut self, pivot: DVec2) -> Self {
        self.pivot = pivot.clamp(DVec2::ZERO, DVec2::ONE);
        self
    }

    /// Replaces the pixels-per-unit factor.
    pub fn with_pixels_per_unit(mut self, pixels_per_unit: f64) -> Self {
        self.pixels_per_unit = pixels_per_unit;
        self
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Writes the pixel at `(x, y)` with channels clamped to [0, 1].
    ///
    /// Returns `false` and leaves the buffer untouched outside the grid.
    pub fn set(&mut self, x: usize, y: usize, color: Rgba) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.pixels[y * self.width + x] = clamp_unit(color);
        true
    }

    /// Iterates over all pixels yielding `(x, y, color)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Rgba)> + '_ {
        self.pixels.iter().enumerate().map(|(i, &c)| {
            let x = i % self.width;
            let y = i / self.width;
            (x, y, c)
        })
    }

    /// Number of pixels whose alpha exceeds `threshold`.
    pub fn coverage(&self, threshold: f64) -> usize {
        self.pixels.iter().filter(|c| c.a > threshold).count()
    }

    /// Fraction of the grid whose alpha exceeds `threshold`.
    pub fn coverage_ratio(&self, threshold: f64) -> f64 {
        self.coverage(threshold) as f64 / self.pixels.len() as f64
    }

    /// Fills every pixel by evaluating `shade` at the pixel center.
    ///
    /// `shade` receives the center `(x + 0.5, y + 0.5)` and the integer
    /// coordinates; results are clamped to [0, 1].
    pub(crate) fn fill_with<F>(&mut self, mut shade: F)
    where
        F: FnMut(DVec2, usize, usize) -> Rgba,
    {
        let width = self.width;
        for (i, pixel) in self.pixels.iter_mut().enumerate() {
            let x = i % width;
            let y = i / width;
            let center = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
            *pixel = clamp_unit(shade(center, x, y));
        }
    }

    /// Same grid and metadata with every pixel passed through `map`.
    pub(crate) fn map_pixels<F>(&self, mut map: F) -> PixelBuffer
    where
        F: FnMut(usize, usize, Rgba) -> Rgba,
    {
        let pixels = self
            .iter()
            .map(|(x, y, c)| clamp_unit(map(x, y, c)))
            .collect();
        PixelBuffer {
            width: self.width,
            height: self.height,
            pixels,
            pivot: self.pivot,
            pixels_per_unit: self.pixels_per_unit,
        }
    }
}

fn checked_len(width: usize, height: usize) -> Result<usize, SpriteError> {
    if width == 0 || height == 0 {
        return Err(SpriteError::InvalidDimension { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(SpriteError::InvalidDimension { width, height })
}

/// Clamps channels to [0, 1]; a NaN channel becomes 0.
fn clamp_unit(c: Rgba) -> Rgba {
    let unit = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
    Rgba::new(unit(c.r), unit(c.g), unit(c.b), unit(c.a))
}

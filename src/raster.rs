//! Immutable RGB raster used throughout the pipeline.

use crate::{AsciiArtError, Result};
use image::{Rgb, RgbImage};
use std::path::Path;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Row-major grid of RGB samples. Transforms always build a new image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pixels: Vec<Rgb<u8>>,
    width: u32,
    height: u32,
}

impl RasterImage {
    /// Decode an image file of any format the `image` crate understands.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let rgb = image::open(path)
            .map_err(|source| AsciiArtError::Decode { path: path.to_path_buf(), source })?
            .to_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(Self { pixels: rgb.pixels().copied().collect(), width, height })
    }

    /// Build from an explicit row-major pixel buffer.
    ///
    /// Fails with `PixelCount` when the buffer length is not `width * height`.
    pub fn from_pixels(pixels: Vec<Rgb<u8>>, width: u32, height: u32) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(AsciiArtError::PixelCount { expected, actual: pixels.len() });
        }
        Ok(Self { pixels, width, height })
    }

    /// Build by evaluating `f(row, col)` for every cell.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgb<u8>) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for row in 0..height {
            for col in 0..width {
                pixels.push(f(row, col));
            }
        }
        Self { pixels, width, height }
    }

    /// Uniformly coloured image.
    pub fn filled(width: u32, height: u32, color: Rgb<u8>) -> Self {
        Self { pixels: vec![color; width as usize * height as usize], width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sample at (`row`, `col`); `IndexOutOfRange` outside the grid.
    pub fn pixel(&self, row: u32, col: u32) -> Result<Rgb<u8>> {
        if row >= self.height || col >= self.width {
            return Err(AsciiArtError::IndexOutOfRange {
                row,
                col,
                height: self.height,
                width: self.width,
            });
        }
        Ok(self.pixels[self.index(row, col)])
    }

    /// All samples in row-major order.
    pub fn pixels(&self) -> &[Rgb<u8>] {
        &self.pixels
    }

    /// Encode to `path`; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let raw: Vec<u8> = self.pixels.iter().flat_map(|p| p.0).collect();
        let buffer = RgbImage::from_raw(self.width, self.height, raw).ok_or(
            AsciiArtError::PixelCount {
                expected: self.width as usize * self.height as usize,
                actual: self.pixels.len(),
            },
        )?;
        buffer
            .save(path)
            .map_err(|source| AsciiArtError::Encode { path: path.to_path_buf(), source })
    }

    // Callers check bounds first.
    pub(crate) fn index(&self, row: u32, col: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }
}

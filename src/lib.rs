//! Image to ASCII art converter using glyph brightness matching.

pub mod config;
pub mod glyph;
pub mod matcher;
pub mod output;
pub mod partition;
pub mod raster;
pub mod shell;

pub use glyph::{BuiltinGlyphs, FontGlyphs, GlyphSource};
pub use matcher::BrightnessMatcher;
pub use raster::RasterImage;

use rayon::prelude::*;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AsciiArtError {
    #[error("Cannot decode image {}: {source}", .path.display())]
    Decode { path: PathBuf, source: image::ImageError },
    #[error("Cannot encode image {}: {source}", .path.display())]
    Encode { path: PathBuf, source: image::ImageError },
    #[error("Pixel ({row}, {col}) outside {height}x{width} image")]
    IndexOutOfRange { row: u32, col: u32, height: u32, width: u32 },
    #[error("Expected {expected} pixels, got {actual}")]
    PixelCount { expected: usize, actual: usize },
    #[error("Charset is empty")]
    EmptyCharset,
    #[error("Invalid resolution {resolution}: {reason}")]
    InvalidResolution { resolution: u32, reason: String },
    #[error("Font error: {0}")]
    Font(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AsciiArtError>;

/// Rendered characters, `[row][col]`.
pub type CharGrid = Vec<Vec<char>>;

/// Pads, splits and matches an image against a charset.
pub struct AsciiArtAlgorithm<'a> {
    image: &'a RasterImage,
    resolution: u32,
}

impl<'a> AsciiArtAlgorithm<'a> {
    pub fn new(image: &'a RasterImage, resolution: u32) -> Self {
        Self { image, resolution }
    }

    /// Produce one character per sub-image, same shape as the sub-image grid.
    pub fn run(&self, matcher: &mut BrightnessMatcher) -> Result<CharGrid> {
        if matcher.is_empty() {
            return Err(AsciiArtError::EmptyCharset);
        }
        let padded = partition::pad(self.image);
        let cells = partition::split(&padded, self.resolution)?;

        let levels: Vec<Vec<f64>> = cells
            .par_iter()
            .map(|row| row.iter().map(partition::brightness).collect())
            .collect();

        levels
            .iter()
            .map(|row| row.iter().map(|&b| matcher.match_brightness(b)).collect::<Result<Vec<_>>>())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStep {
    Up,
    Down,
}

/// Double or halve `current`, keeping it within `[max(1, width / height), width]`.
pub fn step_resolution(current: u32, step: ResolutionStep, width: u32, height: u32) -> Result<u32> {
    let next = match step {
        ResolutionStep::Up => current.saturating_mul(2),
        ResolutionStep::Down => current / 2,
    };
    let out_of_bounds = |reason: String| AsciiArtError::InvalidResolution { resolution: next, reason };

    if next > width {
        return Err(out_of_bounds(format!("exceeds image width {width}")));
    }
    let min = (width as f64 / height.max(1) as f64).max(1.0);
    if (next as f64) < min {
        return Err(out_of_bounds(format!("below minimum {min}")));
    }
    Ok(next)
}

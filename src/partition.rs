//! Image partitioning - pads to power-of-two dimensions and splits into square cells.

use crate::raster::{RasterImage, WHITE};
use crate::{AsciiArtError, Result};
use image::Rgb;

// Rec. 709 luma weights
const RED_WEIGHT: f64 = 0.2126;
const GREEN_WEIGHT: f64 = 0.7152;
const BLUE_WEIGHT: f64 = 0.0722;

/// Grid of equally sized sub-images, `[row][col]`.
pub type SubImageGrid = Vec<Vec<RasterImage>>;

/// Grow each axis independently to the next power of two, centring the
/// original on a white background.
///
/// The leading offset is `gap / 2` (integer division), so an odd gap puts the
/// extra white row or column on the trailing edge.
pub fn pad(image: &RasterImage) -> RasterImage {
    let (width, height) = (image.width(), image.height());
    let (padded_w, padded_h) = (width.next_power_of_two(), height.next_power_of_two());
    if (padded_w, padded_h) == (width, height) {
        return image.clone();
    }

    let row_off = (padded_h - height) / 2;
    let col_off = (padded_w - width) / 2;
    let src = image.pixels();

    RasterImage::from_fn(padded_w, padded_h, |row, col| {
        let inside = row >= row_off
            && row < row_off + height
            && col >= col_off
            && col < col_off + width;
        if inside {
            src[image.index(row - row_off, col - col_off)]
        } else {
            WHITE
        }
    })
}

/// Side length of one square cell when `image` is cut into `resolution` rows.
///
/// `resolution` must be non-zero, divide the height exactly and leave a cell no
/// wider than the image.
pub fn cell_side(image: &RasterImage, resolution: u32) -> Result<u32> {
    let invalid = |reason: &str| AsciiArtError::InvalidResolution {
        resolution,
        reason: reason.to_string(),
    };
    if resolution == 0 {
        return Err(invalid("resolution must be at least 1"));
    }
    if image.height() % resolution != 0 {
        return Err(invalid(&format!(
            "does not evenly divide image height {}",
            image.height()
        )));
    }
    let side = image.height() / resolution;
    if side > image.width() {
        return Err(invalid(&format!(
            "cell side {side} exceeds image width {}",
            image.width()
        )));
    }
    Ok(side)
}

/// Cut a padded image into `resolution` rows of square cells.
///
/// Cell `[t][i]` starts at pixel row `t * side`, column `i * side`. Columns
/// that do not fill a whole cell are dropped.
pub fn split(image: &RasterImage, resolution: u32) -> Result<SubImageGrid> {
    let side = cell_side(image, resolution)?;
    let cols = image.width() / side;
    let src = image.pixels();

    let grid = (0..resolution)
        .map(|t| {
            (0..cols)
                .map(|i| {
                    let (y0, x0) = (t * side, i * side);
                    RasterImage::from_fn(side, side, |row, col| {
                        src[image.index(y0 + row, x0 + col)]
                    })
                })
                .collect()
        })
        .collect();
    Ok(grid)
}

/// Perceptual grey level of one sample, in [0, 255].
pub fn luminance(pixel: Rgb<u8>) -> f64 {
    let [r, g, b] = pixel.0;
    f64::from(r) * RED_WEIGHT + f64::from(g) * GREEN_WEIGHT + f64::from(b) * BLUE_WEIGHT
}

/// Mean luminance over every pixel, normalised to [0, 1].
pub fn brightness(image: &RasterImage) -> f64 {
    let pixels = image.pixels();
    if pixels.is_empty() {
        return 0.0;
    }
    let sum: f64 = pixels.iter().map(|&p| luminance(p)).sum();
    sum / pixels.len() as f64 / 255.0
}

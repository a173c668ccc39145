//! Glyph masks - the 16×16 on/off bitmap each character's brightness is derived from.

use crate::{AsciiArtError, Result};
use fontdue::{Font, FontSettings};
use std::path::Path;

pub const CELL: usize = 16;

/// Row-major 16×16 coverage mask, `true` = ink.
pub type GlyphMask = [[bool; CELL]; CELL];

/// Source of glyph masks for brightness matching.
pub trait GlyphSource {
    fn mask(&self, c: char) -> GlyphMask;
}

/// Number of inked cells, out of 256.
pub fn ink_count(mask: &GlyphMask) -> u16 {
    mask.iter().flatten().filter(|&&on| on).count() as u16
}

/// Fraction of inked cells, in [0, 1].
pub fn raw_brightness(mask: &GlyphMask) -> f64 {
    f64::from(ink_count(mask)) / (CELL * CELL) as f64
}

/// Built-in 5×7 bitmap font for printable ASCII, drawn at 2× scale.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinGlyphs;

const SCALE: usize = 2;
const COL_OFF: usize = (CELL - 5 * SCALE) / 2;
const ROW_OFF: usize = (CELL - 7 * SCALE) / 2;

impl GlyphSource for BuiltinGlyphs {
    fn mask(&self, c: char) -> GlyphMask {
        let cp = c as u32;
        if !(0x20..=0x7E).contains(&cp) {
            return tofu();
        }
        let rows = &FONT_5X7[(cp - 0x20) as usize];
        let mut mask = [[false; CELL]; CELL];
        for (gy, bits) in rows.iter().enumerate() {
            for gx in 0..5 {
                if bits & (0b10000 >> gx) == 0 {
                    continue;
                }
                for dy in 0..SCALE {
                    for dx in 0..SCALE {
                        mask[ROW_OFF + gy * SCALE + dy][COL_OFF + gx * SCALE + dx] = true;
                    }
                }
            }
        }
        mask
    }
}

// Hollow box for characters the bitmap font does not cover
fn tofu() -> GlyphMask {
    let mut mask = [[false; CELL]; CELL];
    let (top, bottom, left, right) = (ROW_OFF, ROW_OFF + 7 * SCALE - 1, COL_OFF, COL_OFF + 5 * SCALE - 1);
    for row in top..=bottom {
        for col in left..=right {
            mask[row][col] = row == top || row == bottom || col == left || col == right;
        }
    }
    mask
}

/// Masks rasterised from a TrueType/OpenType font.
pub struct FontGlyphs {
    font: Font,
    px: f32,
}

impl FontGlyphs {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(std::fs::read(path)?)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| AsciiArtError::Font(e.to_string()))?;
        // ~87.5% of the cell leaves room for descenders
        Ok(Self { font, px: CELL as f32 * 0.875 })
    }
}

impl GlyphSource for FontGlyphs {
    fn mask(&self, c: char) -> GlyphMask {
        let (metrics, bitmap) = self.font.rasterize(c, self.px);
        place(metrics.width, metrics.height, metrics.ymin, &bitmap)
    }
}

/// Drop a `width`×`height` coverage bitmap into the cell: baseline 3/4 down,
/// centred horizontally, clipped at the edges. Coverage ≥ 128 is ink.
fn place(width: usize, height: usize, ymin: i32, coverage: &[u8]) -> GlyphMask {
    let mut mask = [[false; CELL]; CELL];
    if width == 0 || height == 0 {
        return mask;
    }

    let size = CELL as i32;
    let baseline_y = size * 3 / 4;
    let y_offset = baseline_y - height as i32 - ymin;
    let x_offset = (size - width as i32) / 2;

    for sy in 0..height {
        for sx in 0..width {
            let tx = x_offset + sx as i32;
            let ty = y_offset + sy as i32;
            if tx >= 0 && tx < size && ty >= 0 && ty < size {
                mask[ty as usize][tx as usize] = coverage[sy * width + sx] >= 128;
            }
        }
    }
    mask
}

/// Row bitmaps for 0x20..=0x7E, five columns each, MSB on the left.
const FONT_5X7: [[u8; 7]; 95] = [
    [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000], // ' '
    [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100], // !
    [0b01010, 0b01010, 0b01010, 0b00000, 0b00000, 0b00000, 0b00000], // "
    [0b01010, 0b01010, 0b11111, 0b01010, 0b11111, 0b01010, 0b01010], // #
    [0b00100, 0b01111, 0b10100, 0b01110, 0b00101, 0b11110, 0b00100], // $
    [0b11000, 0b11001, 0b00010, 0b00100, 0b01000, 0b10011, 0b00011], // %
    [0b01100, 0b10010, 0b10100, 0b01000, 0b10101, 0b10010, 0b01101], // &
    [0b01100, 0b00100, 0b01000, 0b00000, 0b00000, 0b00000, 0b00000], // '
    [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010], // (
    [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000], // )
    [0b00000, 0b00100, 0b10101, 0b01110, 0b10101, 0b00100, 0b00000], // *
    [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000], // +
    [0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000], // ,
    [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000], // -
    [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100], // .
    [0b00000, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b00000], // /
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110], // 0
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // 1
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111], // 2
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110], // 3
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010], // 4
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110], // 5
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110], // 6
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000], // 7
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110], // 8
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100], // 9
    [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000], // :
    [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b00100, 0b01000], // ;
    [0b00010, 0b00100, 0b01000, 0b10000, 0b01000, 0b00100, 0b00010], // <
    [0b00000, 0b00000, 0b11111, 0b00000, 0b11111, 0b00000, 0b00000], // =
    [0b01000, 0b00100, 0b00010, 0b00001, 0b00010, 0b00100, 0b01000], // >
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100], // ?
    [0b01110, 0b10001, 0b00001, 0b01101, 0b10101, 0b10101, 0b01110], // @
    [0b01110, 0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001], // A
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110], // B
    [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110], // C
    [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100], // D
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111], // E
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000], // F
    [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111], // G
    [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001], // H
    [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // I
    [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100], // J
    [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001], // K
    [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111], // L
    [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001], // M
    [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001], // N
    [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110], // O
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000], // P
    [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101], // Q
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001], // R
    [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110], // S
    [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100], // T
    [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110], // U
    [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100], // V
    [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010], // W
    [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001], // X
    [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100], // Y
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111], // Z
    [0b01110, 0b01000, 0b01000, 0b01000, 0b01000, 0b01000, 0b01110], // [
    [0b00000, 0b10000, 0b01000, 0b00100, 0b00010, 0b00001, 0b00000], // \
    [0b01110, 0b00010, 0b00010, 0b00010, 0b00010, 0b00010, 0b01110], // ]
    [0b00100, 0b01010, 0b10001, 0b00000, 0b00000, 0b00000, 0b00000], // ^
    [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b11111], // _
    [0b01000, 0b00100, 0b00010, 0b00000, 0b00000, 0b00000, 0b00000], // `
    [0b00000, 0b00000, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111], // a
    [0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b11110], // b
    [0b00000, 0b00000, 0b01110, 0b10000, 0b10000, 0b10001, 0b01110], // c
    [0b00001, 0b00001, 0b01101, 0b10011, 0b10001, 0b10001, 0b01111], // d
    [0b00000, 0b00000, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110], // e
    [0b00110, 0b01001, 0b01000, 0b11100, 0b01000, 0b01000, 0b01000], // f
    [0b00000, 0b01111, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110], // g
    [0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001], // h
    [0b00100, 0b00000, 0b01100, 0b00100, 0b00100, 0b00100, 0b01110], // i
    [0b00010, 0b00000, 0b00110, 0b00010, 0b00010, 0b10010, 0b01100], // j
    [0b10000, 0b10000, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010], // k
    [0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // l
    [0b00000, 0b00000, 0b11010, 0b10101, 0b10101, 0b10001, 0b10001], // m
    [0b00000, 0b00000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001], // n
    [0b00000, 0b00000, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110], // o
    [0b00000, 0b00000, 0b11110, 0b10001, 0b11110, 0b10000, 0b10000], // p
    [0b00000, 0b00000, 0b01101, 0b10011, 0b01111, 0b00001, 0b00001], // q
    [0b00000, 0b00000, 0b10110, 0b11001, 0b10000, 0b10000, 0b10000], // r
    [0b00000, 0b00000, 0b01110, 0b10000, 0b01110, 0b00001, 0b11110], // s
    [0b01000, 0b01000, 0b11100, 0b01000, 0b01000, 0b01001, 0b00110], // t
    [0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b10011, 0b01101], // u
    [0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100], // v
    [0b00000, 0b00000, 0b10001, 0b10001, 0b10101, 0b10101, 0b01010], // w
    [0b00000, 0b00000, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001], // x
    [0b00000, 0b00000, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110], // y
    [0b00000, 0b00000, 0b11111, 0b00010, 0b00100, 0b01000, 0b11111], // z
    [0b00010, 0b00100, 0b00100, 0b01000, 0b00100, 0b00100, 0b00010], // {
    [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100], // |
    [0b01000, 0b00100, 0b00100, 0b00010, 0b00100, 0b00100, 0b01000], // }
    [0b00000, 0b00000, 0b01000, 0b10101, 0b00010, 0b00000, 0b00000], // ~
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_is_blank() {
        let mask = BuiltinGlyphs.mask(' ');
        assert_eq!(ink_count(&mask), 0);
        assert_eq!(raw_brightness(&mask), 0.0);
    }

    #[test]
    fn builtin_scales_each_dot_to_four_cells() {
        // '|' has one dot per row, seven rows
        assert_eq!(ink_count(&BuiltinGlyphs.mask('|')), 7 * 4);
        // '-' is a single full row
        assert_eq!(ink_count(&BuiltinGlyphs.mask('-')), 5 * 4);
    }

    #[test]
    fn dense_glyphs_are_brighter_than_sparse() {
        let b = |c| raw_brightness(&BuiltinGlyphs.mask(c));
        assert!(b('#') > b('.'));
        assert!(b('M') > b('i'));
        assert!(b('8') > b('1'));
    }

    #[test]
    fn uncovered_characters_get_a_box() {
        let mask = BuiltinGlyphs.mask('é');
        // perimeter of a 10×14 rectangle
        assert_eq!(ink_count(&mask), 2 * 10 + 2 * 14 - 4);
        assert_eq!(mask, BuiltinGlyphs.mask('€'));
    }

    #[test]
    fn coverage_threshold_is_half() {
        assert_eq!(ink_count(&place(1, 1, 0, &[127])), 0);
        assert_eq!(ink_count(&place(1, 1, 0, &[128])), 1);
    }

    #[test]
    fn placed_glyph_sits_on_baseline_centred() {
        let mask = place(4, 2, 0, &[255; 8]);
        assert_eq!(ink_count(&mask), 8);
        // baseline row 12: glyph occupies rows 10-11, columns 6-9
        assert!(mask[10][6] && mask[11][9]);
        assert!(!mask[10][5] && !mask[10][10] && !mask[12][6]);
    }

    #[test]
    fn descender_drops_below_baseline() {
        let mask = place(1, 5, -3, &[255; 5]);
        assert_eq!(ink_count(&mask), 5);
        assert!(mask[10][7] && mask[12][7] && mask[14][7]);
        assert!(!mask[15][7]);
    }

    #[test]
    fn oversized_glyph_is_clipped() {
        let mask = place(20, 30, 0, &[255; 600]);
        // rows 0-11 above the baseline, all 16 columns
        assert_eq!(ink_count(&mask), 12 * 16);
        assert!(mask[11].iter().all(|&on| on));
        assert!(!mask[12][0]);
    }

    #[test]
    fn empty_bitmap_is_blank() {
        assert_eq!(ink_count(&place(0, 0, 0, &[])), 0);
    }

    #[test]
    fn font_glyphs_reject_garbage() {
        let err = FontGlyphs::from_bytes(vec![0, 1, 2, 3]).err().unwrap();
        assert!(matches!(err, AsciiArtError::Font(_)));
    }
}

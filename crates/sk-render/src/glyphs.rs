//! Label text rasterization using the Spleen 12×24 bitmap font.
//!
//! Glyphs are box-filtered down (or up) to the requested size so labels
//! stay legible at any font size without shipping a vector font.

use crate::raster::paint_mask;
use image::RgbaImage;
use kurbo::Point;
use sk_core::Color;
use spleen_font::{FONT_12X24, PSF2Font};

const GLYPH_W: usize = 12;
const GLYPH_H: usize = 24;
/// Subsamples per axis when box-filtering a glyph cell.
const SUBSAMPLES: usize = 4;

/// Per-pixel coverage of a rendered line of text.
#[derive(Debug, Clone, Default)]
pub struct TextMask {
    pub width: usize,
    pub height: usize,
    pub coverage: Vec<f32>,
}

/// Cell size for a glyph of height `size` pixels (half as wide as tall).
pub fn cell_size(size: f64) -> (usize, usize) {
    let h = size.round().max(1.0) as usize;
    let w = (size / 2.0).round().max(1.0) as usize;
    (w, h)
}

/// Rasterize one line of text into a coverage mask.
pub fn rasterize_text(text: &str, size: f64) -> TextMask {
    let (cell_w, cell_h) = cell_size(size);
    let chars: Vec<char> = text.chars().collect();
    let width = cell_w * chars.len();
    let mut mask = TextMask {
        width,
        height: cell_h,
        coverage: vec![0.0; width * cell_h],
    };
    if chars.is_empty() {
        return mask;
    }

    let mut font = match PSF2Font::new(FONT_12X24) {
        Ok(font) => font,
        Err(_) => {
            log::warn!("bitmap font failed to load; label {text:?} not drawn");
            return TextMask::default();
        }
    };

    let mut utf8 = [0u8; 4];
    for (i, ch) in chars.iter().enumerate() {
        let mut bits = [false; GLYPH_W * GLYPH_H];
        match font.glyph_for_utf8(ch.encode_utf8(&mut utf8).as_bytes()) {
            Some(glyph) => {
                for (row_y, row) in glyph.enumerate() {
                    for (col_x, on) in row.enumerate() {
                        if row_y < GLYPH_H && col_x < GLYPH_W {
                            bits[row_y * GLYPH_W + col_x] = on;
                        }
                    }
                }
            }
            // Unknown glyph: hollow box
            None => {
                for x in 0..GLYPH_W {
                    bits[x] = true;
                    bits[(GLYPH_H - 1) * GLYPH_W + x] = true;
                }
                for y in 0..GLYPH_H {
                    bits[y * GLYPH_W] = true;
                    bits[y * GLYPH_W + GLYPH_W - 1] = true;
                }
            }
        }

        for ty in 0..cell_h {
            for tx in 0..cell_w {
                let mut hits = 0usize;
                for sy in 0..SUBSAMPLES {
                    for sx in 0..SUBSAMPLES {
                        let gx = (tx * SUBSAMPLES + sx) * GLYPH_W / (cell_w * SUBSAMPLES);
                        let gy = (ty * SUBSAMPLES + sy) * GLYPH_H / (cell_h * SUBSAMPLES);
                        if bits[gy * GLYPH_W + gx] {
                            hits += 1;
                        }
                    }
                }
                mask.coverage[ty * width + i * cell_w + tx] =
                    hits as f32 / (SUBSAMPLES * SUBSAMPLES) as f32;
            }
        }
    }
    mask
}

/// Draw text centred on `center` (centre alignment, middle baseline).
pub fn draw_text_centered(img: &mut RgbaImage, text: &str, center: Point, size: f64, color: Color) {
    let mask = rasterize_text(text, size);
    if mask.width == 0 {
        return;
    }
    let origin = (
        (center.x - mask.width as f64 / 2.0).round() as i64,
        (center.y - mask.height as f64 / 2.0).round() as i64,
    );
    paint_mask(img, origin, &mask.coverage, mask.width, color);
}

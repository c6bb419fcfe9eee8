//! Anti-aliased painting primitives on an RGBA pixel buffer.
//!
//! All coordinates are raster (device pixel) coordinates; a pixel's
//! sample point is its centre `(x + 0.5, y + 0.5)`. Coverage is derived
//! from the distance to the shape's edge, which gives round caps and
//! round joins for free when consecutive segments share endpoints.

use image::{Rgba, RgbaImage};
use kurbo::{Line, ParamCurve, Point, Rect};
use sk_core::Color;
use smallvec::SmallVec;

/// Source-over blend of `color` at the given coverage (`0.0..=1.0`).
pub fn blend_pixel(img: &mut RgbaImage, x: u32, y: u32, color: Color, coverage: f64) {
    let alpha = coverage.clamp(0.0, 1.0) * f64::from(color.a) / 255.0;
    if alpha <= 0.0 {
        return;
    }
    let px = img.get_pixel_mut(x, y);
    if alpha >= 1.0 {
        *px = Rgba(color.to_rgba());
        return;
    }
    let src = color.to_rgba();
    let dst_a = f64::from(px[3]) / 255.0;
    let out_a = alpha + dst_a * (1.0 - alpha);
    for c in 0..3 {
        let s = f64::from(src[c]) * alpha;
        let d = f64::from(px[c]) * dst_a * (1.0 - alpha);
        px[c] = ((s + d) / out_a).round().clamp(0.0, 255.0) as u8;
    }
    px[3] = (out_a * 255.0).round() as u8;
}

/// Shortest distance from `p` to the segment `a..b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.hypot2();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Integer pixel range covered by `rect`, clipped to the image.
fn pixel_span(img: &RgbaImage, rect: Rect) -> Option<(u32, u32, u32, u32)> {
    let (w, h) = img.dimensions();
    let x0 = rect.x0.floor().max(0.0);
    let y0 = rect.y0.floor().max(0.0);
    let x1 = rect.x1.ceil().min(f64::from(w));
    let y1 = rect.y1.ceil().min(f64::from(h));
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

/// Stroke a segment with round caps.
pub fn stroke_segment(img: &mut RgbaImage, line: Line, width: f64, color: Color) {
    let radius = (width / 2.0).max(0.5);
    let bounds = Rect::from_points(line.p0, line.p1).inflate(radius + 1.0, radius + 1.0);
    let Some((x0, y0, x1, y1)) = pixel_span(img, bounds) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let d = distance_to_segment(center, line.p0, line.p1);
            blend_pixel(img, x, y, color, radius + 0.5 - d);
        }
    }
}

/// Fill a disc.
pub fn fill_disc(img: &mut RgbaImage, center: Point, radius: f64, color: Color) {
    let bounds = Rect::from_center_size(center, (radius * 2.0 + 2.0, radius * 2.0 + 2.0));
    let Some((x0, y0, x1, y1)) = pixel_span(img, bounds) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            blend_pixel(img, x, y, color, radius + 0.5 - p.distance(center));
        }
    }
}

/// Split a line into its "on" pieces for a `[on, off]` dash pattern.
pub fn dash_segments(line: Line, dash: [f64; 2]) -> SmallVec<[Line; 16]> {
    let mut pieces = SmallVec::new();
    let length = line.p0.distance(line.p1);
    let period = dash[0] + dash[1];
    if length == 0.0 || dash[0] <= 0.0 || period <= 0.0 {
        pieces.push(line);
        return pieces;
    }
    let mut offset = 0.0;
    while offset < length {
        let end = (offset + dash[0]).min(length);
        pieces.push(line.subsegment(offset / length..end / length));
        offset += period;
    }
    pieces
}

/// Stroke a dashed segment.
pub fn stroke_dashed(img: &mut RgbaImage, line: Line, width: f64, dash: [f64; 2], color: Color) {
    for piece in dash_segments(line, dash) {
        stroke_segment(img, piece, width, color);
    }
}

/// Paint a coverage mask (`0.0..=1.0` per cell) with its top-left at `origin`.
pub fn paint_mask(
    img: &mut RgbaImage,
    origin: (i64, i64),
    mask: &[f32],
    mask_width: usize,
    color: Color,
) {
    if mask_width == 0 {
        return;
    }
    let (w, h) = img.dimensions();
    for (i, &coverage) in mask.iter().enumerate() {
        if coverage <= 0.0 {
            continue;
        }
        let x = origin.0 + (i % mask_width) as i64;
        let y = origin.1 + (i / mask_width) as i64;
        if x < 0 || y < 0 || x >= i64::from(w) || y >= i64::from(h) {
            continue;
        }
        blend_pixel(img, x as u32, y as u32, color, f64::from(coverage));
    }
}

//! Freehand strokes: connected round-capped segments between successive
//! pointer samples.

use kurbo::{Line, Point};
use sk_core::Color;
use sk_render::Surface;
use sk_render::raster::stroke_segment;

#[derive(Debug, Default)]
pub struct StrokeEngine {
    last: Option<Point>,
}

impl StrokeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a stroke at `point` (raster coordinates). Nothing is drawn yet.
    pub fn begin(&mut self, point: Point) {
        self.last = Some(point);
    }

    /// Draw the segment from the previous sample to `point`.
    /// `width` is logical; it is scaled by the surface's pixel ratio.
    pub fn extend(&mut self, surface: &mut Surface, point: Point, color: Color, width: f64) -> Option<Line> {
        let last = self.last?;
        let line = Line::new(last, point);
        paint_segment(surface, line, color, width);
        self.last = Some(point);
        Some(line)
    }

    pub fn end(&mut self) {
        self.last = None;
    }

    pub fn is_active(&self) -> bool {
        self.last.is_some()
    }

    pub fn last_point(&self) -> Option<Point> {
        self.last
    }
}

/// Paint one stroke segment onto a surface.
pub fn paint_segment(surface: &mut Surface, line: Line, color: Color, width: f64) {
    let device_width = width * surface.scale();
    stroke_segment(surface.pixels_mut(), line, device_width, color);
}

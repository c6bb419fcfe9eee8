//! Measurement overlay → raster drawing.
//!
//! Committed measurements are drawn solid in the measurement colour; the
//! in-progress drag is drawn dashed, with its provisional label in the muted
//! preview colour. All sizes are logical and scaled by the surface's device
//! pixel ratio.

use crate::glyphs::draw_text_centered;
use crate::raster::{fill_disc, stroke_dashed, stroke_segment};
use crate::surface::Surface;
use kurbo::Line;
use sk_core::{Color, Measurement, MeasurementStyle};

/// Draw one committed measurement: line, endpoint markers, centred label.
pub fn draw_measurement(surface: &mut Surface, m: &Measurement, style: &MeasurementStyle) {
    let scale = surface.scale();
    let img = surface.pixels_mut();
    let line = Line::new(m.start, m.end);
    stroke_segment(img, line, MeasurementStyle::LINE_WIDTH * scale, style.color);
    fill_disc(img, m.start, MeasurementStyle::MARKER_RADIUS * scale, style.color);
    fill_disc(img, m.end, MeasurementStyle::MARKER_RADIUS * scale, style.color);
    draw_text_centered(img, &m.label(), m.midpoint(), style.font_size * scale, style.color);
}

/// Draw the live drag preview with its provisional label.
pub fn draw_preview(surface: &mut Surface, line: Line, label: &str, style: &MeasurementStyle) {
    let scale = surface.scale();
    let dash = MeasurementStyle::DASH.map(|d| d * scale);
    let img = surface.pixels_mut();
    stroke_dashed(img, line, MeasurementStyle::LINE_WIDTH * scale, dash, style.color);
    fill_disc(img, line.p0, MeasurementStyle::MARKER_RADIUS * scale, style.color);
    fill_disc(img, line.p1, MeasurementStyle::MARKER_RADIUS * scale, style.color);
    draw_text_centered(img, label, line.midpoint(), style.font_size * scale, Color::PREVIEW);
}

/// Draw every measurement in insertion order.
pub fn render_measurements(surface: &mut Surface, measurements: &[Measurement], style: &MeasurementStyle) {
    log::trace!("render {} measurement(s)", measurements.len());
    for m in measurements {
        draw_measurement(surface, m, style);
    }
}

/// Rebuild `view` as `base` with the measurement overlay on top.
pub fn compose(view: &mut Surface, base: &Surface, measurements: &[Measurement], style: &MeasurementStyle) {
    view.copy_from(base);
    render_measurements(view, measurements, style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use sk_core::{MeasurementId, Unit};

    fn ruler() -> Measurement {
        Measurement::new(
            MeasurementId::intern("paint_ruler"),
            Point::new(20.0, 60.0),
            Point::new(180.0, 60.0),
            Unit::Px,
        )
    }

    #[test]
    fn committed_measurement_uses_style_color() {
        let mut s = Surface::new(200.0, 120.0, 1.0, Color::WHITE);
        let style = MeasurementStyle::default();
        draw_measurement(&mut s, &ruler(), &style);
        // Marker centre and a point on the line far from the label
        assert_eq!(s.pixels().get_pixel(20, 60).0, style.color.to_rgba());
        assert_eq!(s.pixels().get_pixel(40, 60).0, style.color.to_rgba());
    }

    #[test]
    fn preview_is_dashed_with_muted_label() {
        let mut s = Surface::new(200.0, 120.0, 1.0, Color::WHITE);
        let style = MeasurementStyle::default();
        let line = Line::new(Point::new(20.0, 60.0), Point::new(180.0, 60.0));
        draw_preview(&mut s, line, "160 px", &style);
        // First dash covers 20..25, the gap 25..30
        assert_eq!(s.pixels().get_pixel(22, 60).0, style.color.to_rgba());
        assert_eq!(s.pixels().get_pixel(27, 60).0, [255, 255, 255, 255]);
        // Label "160 px" spans x 76..124 around the midpoint
        let label_ink = (76..124)
            .flat_map(|x| (52..68).map(move |y| (x, y)))
            .any(|(x, y)| {
                let [r, g, b, _] = s.pixels().get_pixel(x, y).0;
                r == g && g == b && r < 200
            });
        assert!(label_ink);
    }

    #[test]
    fn compose_leaves_base_untouched() {
        let base = Surface::new(200.0, 120.0, 1.0, Color::WHITE);
        let mut view = Surface::new(200.0, 120.0, 1.0, Color::BLACK);
        compose(&mut view, &base, &[ruler()], &MeasurementStyle::default());
        assert!(base.pixels().pixels().all(|p| p.0 == [255, 255, 255, 255]));
        assert_eq!(view.pixels().get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_ne!(view.pixels().get_pixel(40, 60).0, [255, 255, 255, 255]);
    }
}

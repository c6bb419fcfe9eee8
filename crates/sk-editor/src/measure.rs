//! Linear measurements: drag to place, click a label to edit.
//!
//! The engine owns the measurement list and the in-flight drag. Committed
//! measurements are an overlay: they are drawn onto the view surface on
//! top of the stroke raster and never baked into it.

use kurbo::{Line, Point};
use sk_core::{Color, Measurement, MeasurementId, MeasurementStyle, Unit};
use sk_render::hit::{LABEL_HIT_RADIUS, hit_test_label};
use sk_render::paint::{draw_measurement, draw_preview, render_measurements};
use sk_render::{RegionSnapshot, Surface};

/// Drags shorter than this (device px) place nothing.
pub const MIN_MEASURE_LENGTH: f64 = 1.0;

struct Drag {
    start: Point,
    end: Point,
    /// View pixels before the preview was drawn.
    snapshot: RegionSnapshot,
}

pub struct MeasurementEngine {
    measurements: Vec<Measurement>,
    unit: Unit,
    style: MeasurementStyle,
    drag: Option<Drag>,
}

impl MeasurementEngine {
    pub fn new(unit: Unit, style: MeasurementStyle) -> Self {
        Self {
            measurements: Vec::new(),
            unit,
            style,
            drag: None,
        }
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn get(&self, id: MeasurementId) -> Option<&Measurement> {
        self.measurements.iter().find(|m| m.id == id)
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn style(&self) -> &MeasurementStyle {
        &self.style
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    // ─── Drag gesture ────────────────────────────────────────────────────

    pub fn begin(&mut self, view: &Surface, point: Point) {
        self.drag = Some(Drag {
            start: point,
            end: point,
            snapshot: view.snapshot_region(),
        });
    }

    /// Redraw the dashed preview from the drag start to `point`.
    pub fn update(&mut self, view: &mut Surface, point: Point) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        drag.end = point;
        if let Err(e) = view.restore_region(&drag.snapshot) {
            log::warn!("measurement preview: {e}");
            return;
        }
        let line = Line::new(drag.start, drag.end);
        let label = format!(
            "{} {}",
            self.unit.format_value(line.length()),
            self.unit.suffix()
        );
        draw_preview(view, line, &label, &self.style);
    }

    /// Finish the drag at `point`. Returns the placed measurement, already
    /// drawn on `view`, or `None` for a zero-length drag.
    pub fn end(&mut self, view: &mut Surface, point: Point) -> Option<Measurement> {
        let drag = self.drag.take()?;
        if let Err(e) = view.restore_region(&drag.snapshot) {
            log::warn!("measurement end: {e}");
        }
        if drag.start.distance(point) < MIN_MEASURE_LENGTH {
            log::debug!("measurement drag too short, discarded");
            return None;
        }
        let m = Measurement::new(MeasurementId::generate(), drag.start, point, self.unit);
        log::debug!("placed {:?}: {}", m.id, m.label());
        draw_measurement(view, &m, &self.style);
        self.measurements.push(m.clone());
        Some(m)
    }

    /// Abandon the drag and put the view back as it was before it started.
    pub fn cancel(&mut self, view: &mut Surface) {
        if let Some(drag) = self.drag.take()
            && let Err(e) = view.restore_region(&drag.snapshot)
        {
            log::warn!("measurement cancel: {e}");
        }
    }

    /// Forget the drag without touching the view.
    pub fn discard(&mut self) {
        self.drag = None;
    }

    // ─── Editing ─────────────────────────────────────────────────────────

    /// Replace a measurement's displayed value. Empty input is rejected;
    /// a trailing unit suffix typed by the user is dropped.
    pub fn edit(&mut self, id: MeasurementId, text: &str) -> bool {
        let value = normalize_value(text, self.unit);
        if value.is_empty() {
            return false;
        }
        match self.measurements.iter_mut().find(|m| m.id == id) {
            Some(m) => {
                m.custom_value = Some(value);
                true
            }
            None => false,
        }
    }

    /// Relabel every measurement in `unit`. Endpoints never move.
    pub fn change_unit(&mut self, unit: Unit) {
        self.unit = unit;
        for m in &mut self.measurements {
            m.unit = unit;
        }
    }

    pub fn set_color(&mut self, color: Color) {
        self.style.color = color;
    }

    /// Non-finite sizes are ignored.
    pub fn set_font_size(&mut self, size: f64) {
        if size.is_finite() {
            self.style.font_size = MeasurementStyle::clamp_font_size(size);
        }
    }

    /// Wheel adjustment: one step against the scroll direction.
    pub fn adjust_font_size(&mut self, delta_y: f64) -> f64 {
        if delta_y != 0.0 && delta_y.is_finite() {
            self.set_font_size(self.style.font_size - delta_y.signum());
        }
        self.style.font_size
    }

    pub fn hit_test(&self, point: Point) -> Option<MeasurementId> {
        hit_test_label(&self.measurements, point, LABEL_HIT_RADIUS)
    }

    // ─── List management ─────────────────────────────────────────────────

    pub fn clear(&mut self) {
        self.measurements.clear();
        self.drag = None;
    }

    /// Adopt a list restored from history.
    pub fn replace(&mut self, measurements: Vec<Measurement>) {
        self.measurements = measurements;
        // Restored entries may predate a unit change
        for m in &mut self.measurements {
            m.unit = self.unit;
        }
    }

    /// Follow a raster rescale.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        for m in &mut self.measurements {
            m.scale(sx, sy);
        }
    }

    /// Draw every committed measurement onto `view`.
    pub fn render(&self, view: &mut Surface) {
        render_measurements(view, &self.measurements, &self.style);
    }
}

/// Trim, and strip one trailing copy of the unit suffix (`"12 cm"` → `"12"`).
fn normalize_value(text: &str, unit: Unit) -> String {
    let trimmed = text.trim();
    let suffix = unit.suffix();
    if trimmed.len() > suffix.len()
        && let Some(head) = trimmed.get(..trimmed.len() - suffix.len())
        && trimmed[head.len()..].eq_ignore_ascii_case(suffix)
    {
        return head.trim_end().to_string();
    }
    trimmed.to_string()
}

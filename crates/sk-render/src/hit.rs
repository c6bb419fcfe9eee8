//! Hit testing: point → measurement label lookup.

use kurbo::Point;
use sk_core::{Measurement, MeasurementId};

/// Radius (device px) around a label's midpoint that counts as a click on it.
pub const LABEL_HIT_RADIUS: f64 = 30.0;

/// Find the measurement whose label midpoint is nearest to `point`, within
/// `radius`. Ties go to the most recently added measurement (topmost).
pub fn hit_test_label(measurements: &[Measurement], point: Point, radius: f64) -> Option<MeasurementId> {
    let mut best: Option<(f64, MeasurementId)> = None;
    // Reverse so later (topmost) labels win ties
    for m in measurements.iter().rev() {
        let d = m.midpoint().distance(point);
        if d >= radius {
            continue;
        }
        if best.is_none_or(|(bd, _)| d < bd) {
            best = Some((d, m.id));
        }
    }
    best.map(|(_, id)| id)
}

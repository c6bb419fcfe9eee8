//! Widget configuration.
//!
//! Hosts pass a JSON object; every field is optional and falls back to
//! the defaults below.

use crate::model::{Color, MeasurementStyle};
use crate::units::Unit;
use serde::{Deserialize, Serialize};

/// Export encoding for the final saved image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SketchConfig {
    /// Maximum number of undo snapshots kept. Default: **50**.
    pub max_history: usize,
    /// Canvas background; the eraser paints with this colour.
    pub background: Color,
    pub pen_color: Color,
    /// Stroke width in logical pixels.
    pub pen_width: f64,
    /// Export quality factor, `0.0..=1.0`. Only lossy formats honour it.
    pub export_quality: f64,
    pub export_format: ImageFormat,
    pub unit: Unit,
    pub measurement: MeasurementStyle,
    pub device_pixel_ratio: f64,
    /// Quiet period before a container resize is applied.
    pub resize_debounce_ms: f64,
    /// Record field the saved sketch is written into.
    pub field: String,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            max_history: 50,
            background: Color::WHITE,
            pen_color: Color::BLACK,
            pen_width: 3.0,
            export_quality: 0.92,
            export_format: ImageFormat::Png,
            unit: Unit::Cm,
            measurement: MeasurementStyle::default(),
            device_pixel_ratio: 1.0,
            resize_debounce_ms: 150.0,
            field: "sketch_image".to_string(),
        }
    }
}

impl SketchConfig {
    /// Load from a JSON object, then clamp out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: SketchConfig =
            serde_json::from_str(json).map_err(|e| format!("Config parse error: {e}"))?;
        Ok(config.sanitized())
    }

    /// Clamp every numeric field into its usable range.
    pub fn sanitized(mut self) -> Self {
        if self.max_history == 0 {
            log::warn!("max_history of 0 is not usable, keeping one snapshot");
            self.max_history = 1;
        }
        self.pen_width = self.pen_width.max(1.0);
        self.export_quality = self.export_quality.clamp(0.0, 1.0);
        self.measurement.font_size = MeasurementStyle::clamp_font_size(self.measurement.font_size);
        if !(self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0) {
            self.device_pixel_ratio = 1.0;
        }
        self.resize_debounce_ms = self.resize_debounce_ms.max(0.0);
        self
    }
}

//! Core data model: colours and placed measurements.
//!
//! Strokes have no structured form; they live only as pixels in the
//! raster surface. Measurements are the only persistent structured entity.

use crate::id::MeasurementId;
use crate::units::Unit;
use kurbo::Point;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ─── Color ───────────────────────────────────────────────────────────────

/// 8-bit RGBA colour, matching the raster's pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Muted grey used for in-progress measurement labels.
    pub const PREVIEW: Color = Color::rgb(0x88, 0x88, 0x88);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 | 4 => {
                let r = hex_val(bytes[0])? * 17;
                let g = hex_val(bytes[1])? * 17;
                let b = hex_val(bytes[2])? * 17;
                let a = match bytes.get(3) {
                    Some(&c) => hex_val(c)? * 17,
                    None => 0xFF,
                };
                Some(Self::rgba(r, g, b, a))
            }
            6 | 8 => {
                let pair = |i: usize| -> Option<u8> {
                    Some(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?)
                };
                let a = if bytes.len() == 8 { pair(6)? } else { 0xFF };
                Some(Self::rgba(pair(0)?, pair(2)?, pair(4)?, a))
            }
            _ => None,
        }
    }

    /// Emit `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 0xFF {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        crate::parser::parse_color(&s).map_err(serde::de::Error::custom)
    }
}

// ─── Measurement ─────────────────────────────────────────────────────────

/// A placed linear measurement.
///
/// Endpoints are in raster (device pixel) coordinates. The raw pixel length
/// is fixed at creation; the displayed value is derived from it in the
/// current unit unless the user typed an override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: MeasurementId,
    pub start: Point,
    pub end: Point,
    pub unit: Unit,
    pub pixel_length: f64,
    /// User-entered label text, replacing the derived value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_value: Option<String>,
}

impl Measurement {
    pub fn new(id: MeasurementId, start: Point, end: Point, unit: Unit) -> Self {
        Self {
            id,
            start,
            end,
            unit,
            pixel_length: start.distance(end),
            custom_value: None,
        }
    }

    /// The value part of the label (without unit suffix).
    pub fn value(&self) -> String {
        match &self.custom_value {
            Some(v) => v.clone(),
            None => self.unit.format_value(self.pixel_length),
        }
    }

    /// Full label text, e.g. `"10.0 cm"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.value(), self.unit.suffix())
    }

    /// Label anchor: the midpoint of the measured segment.
    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }

    /// Scale endpoints after the raster was rescaled.
    /// The recorded pixel length is kept so the displayed value stays put.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.start = Point::new(self.start.x * sx, self.start.y * sy);
        self.end = Point::new(self.end.x * sx, self.end.y * sy);
    }
}

/// How measurements are painted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MeasurementStyle {
    pub color: Color,
    /// Label font size in logical pixels.
    pub font_size: f64,
}

impl MeasurementStyle {
    pub const MIN_FONT_SIZE: f64 = 8.0;
    pub const MAX_FONT_SIZE: f64 = 72.0;
    pub const LINE_WIDTH: f64 = 2.0;
    pub const MARKER_RADIUS: f64 = 4.0;
    pub const DASH: [f64; 2] = [5.0, 5.0];

    pub fn clamp_font_size(size: f64) -> f64 {
        size.clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE)
    }
}

impl Default for MeasurementStyle {
    fn default() -> Self {
        Self {
            color: Color::rgb(0, 0, 0xFF),
            font_size: 16.0,
        }
    }
}

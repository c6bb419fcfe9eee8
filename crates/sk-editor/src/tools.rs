//! Drawing tools and their settings.

use serde::{Deserialize, Serialize};
use sk_core::{Color, SketchConfig};

/// The active tool determines how pointer gestures are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Pen,
    Eraser,
    Measure,
}

impl ToolKind {
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Pen => "pen",
            ToolKind::Eraser => "eraser",
            ToolKind::Measure => "measure",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "pen" => Some(ToolKind::Pen),
            "eraser" => Some(ToolKind::Eraser),
            "measure" => Some(ToolKind::Measure),
            _ => None,
        }
    }
}

/// Pen settings shared by the freehand tools.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolSettings {
    pub color: Color,
    /// Stroke width in logical pixels.
    pub width: f64,
    /// The eraser paints with this.
    pub background: Color,
}

impl ToolSettings {
    pub fn from_config(config: &SketchConfig) -> Self {
        Self {
            color: config.pen_color,
            width: config.pen_width,
            background: config.background,
        }
    }

    /// Colour a freehand stroke paints with.
    pub fn stroke_color(&self, tool: ToolKind) -> Color {
        match tool {
            ToolKind::Eraser => self.background,
            _ => self.color,
        }
    }

    /// The toolbar swatch showing the current brush.
    pub fn preview(&self, tool: ToolKind) -> ToolPreview {
        ToolPreview {
            color: self.stroke_color(tool),
            size: self.width * 4.0,
        }
    }
}

/// Brush swatch: colour and diameter in CSS px.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToolPreview {
    pub color: Color,
    pub size: f64,
}

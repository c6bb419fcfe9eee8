//! Measurement units and the fixed pixel → unit conversion table.
//!
//! The table assumes a 96 DPI reference pixel:
//!
//! | Unit | Pixels per unit | Decimals |
//! |------|-----------------|----------|
//! | mm   | 3.78            | 1        |
//! | cm   | 37.8            | 1        |
//! | m    | 3780            | 2        |
//! | in   | 96              | 1        |
//! | ft   | 1152            | 1        |
//! | px   | 1               | 0        |

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Mm,
    #[default]
    Cm,
    M,
    In,
    Ft,
    Px,
}

impl Unit {
    pub const ALL: [Unit; 6] = [Unit::Mm, Unit::Cm, Unit::M, Unit::In, Unit::Ft, Unit::Px];

    /// Raster pixels that make up one unit.
    pub fn pixels_per_unit(self) -> f64 {
        match self {
            Unit::Mm => 3.78,
            Unit::Cm => 37.8,
            Unit::M => 3780.0,
            Unit::In => 96.0,
            Unit::Ft => 1152.0,
            Unit::Px => 1.0,
        }
    }

    /// Fixed number of decimals shown for this unit.
    pub fn decimals(self) -> usize {
        match self {
            Unit::M => 2,
            Unit::Px => 0,
            _ => 1,
        }
    }

    /// Suffix printed after the value in a label.
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Mm => "mm",
            Unit::Cm => "cm",
            Unit::M => "m",
            Unit::In => "in",
            Unit::Ft => "ft",
            Unit::Px => "px",
        }
    }

    pub fn convert(self, pixels: f64) -> f64 {
        pixels / self.pixels_per_unit()
    }

    /// Convert a pixel distance and format it with the unit's fixed precision.
    /// Ties round away from zero (`2.5 px` shows as `3`).
    pub fn format_value(self, pixels: f64) -> String {
        let decimals = self.decimals();
        let scale = 10f64.powi(decimals as i32);
        let rounded = (self.convert(pixels) * scale).round() / scale;
        format!("{rounded:.decimals$}")
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl std::str::FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse_unit(s)
    }
}

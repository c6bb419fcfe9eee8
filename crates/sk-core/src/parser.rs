//! Parsers for the small text values the toolbar hands us:
//! colour pickers and unit selectors.
//!
//! Built on `winnow` 0.7.

use crate::model::Color;
use crate::units::Unit;
use winnow::ascii::{digit1, space0};
use winnow::combinator::{alt, delimited, preceded, separated};
use winnow::prelude::*;
use winnow::token::take_while;

/// Parse a colour: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA` or `rgb(r, g, b)`.
pub fn parse_color(input: &str) -> Result<Color, String> {
    alt((hex_color, rgb_function))
        .parse(input.trim())
        .map_err(|e| format!("Invalid colour {input:?}: {e}"))
}

/// Parse a unit selector value (`mm`, `cm`, `m`, `in`, `ft`, `px`), case-insensitive.
pub fn parse_unit(input: &str) -> Result<Unit, String> {
    let lowered = input.trim().to_ascii_lowercase();
    unit_token
        .parse(lowered.as_str())
        .map_err(|e| format!("Unknown unit {input:?}: {e}"))
}

// ─── Low-level parsers ──────────────────────────────────────────────────

fn hex_color(input: &mut &str) -> ModalResult<Color> {
    preceded('#', take_while(1..=8, |c: char| c.is_ascii_hexdigit()))
        .verify_map(Color::from_hex)
        .parse_next(input)
}

fn rgb_function(input: &mut &str) -> ModalResult<Color> {
    delimited(
        ("rgb", space0, '(', space0),
        separated(3, channel, (space0, ',', space0)),
        (space0, ')'),
    )
    .map(|c: Vec<u8>| Color::rgb(c[0], c[1], c[2]))
    .parse_next(input)
}

fn channel(input: &mut &str) -> ModalResult<u8> {
    digit1.try_map(|s: &str| s.parse::<u8>()).parse_next(input)
}

fn unit_token(input: &mut &str) -> ModalResult<Unit> {
    // Longest tokens first: `m` would otherwise shadow `mm`.
    alt((
        "mm".value(Unit::Mm),
        "cm".value(Unit::Cm),
        "in".value(Unit::In),
        "ft".value(Unit::Ft),
        "px".value(Unit::Px),
        "m".value(Unit::M),
    ))
    .parse_next(input)
}

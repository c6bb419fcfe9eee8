//! Input abstraction layer.
//!
//! Normalizes mouse, touch, and pen pointer events plus keyboard and wheel
//! events into a unified `InputEvent` enum consumed by the router.
//! Positions are client (CSS) coordinates; the router maps them onto the
//! raster.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Keyboard modifiers held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Self::NONE
    };

    /// Ctrl on most platforms, ⌘ on macOS.
    pub fn cmd(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    Touch,
}

impl PointerKind {
    /// Parse a `PointerEvent.pointerType` string. Unknown types act as touch.
    pub fn from_name(name: &str) -> Self {
        match name {
            "mouse" => PointerKind::Mouse,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Touch,
        }
    }
}

/// One pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub id: i32,
    pub kind: PointerKind,
    /// `PointerEvent.button`: 0 = primary, -1 = none (moves).
    pub button: i16,
    pub client: Point,
}

impl PointerInput {
    pub fn mouse(id: i32, x: f64, y: f64) -> Self {
        Self {
            id,
            kind: PointerKind::Mouse,
            button: 0,
            client: Point::new(x, y),
        }
    }

    pub fn touch(id: i32, x: f64, y: f64) -> Self {
        Self {
            id,
            kind: PointerKind::Touch,
            button: 0,
            client: Point::new(x, y),
        }
    }

    pub fn with_button(mut self, button: i16) -> Self {
        self.button = button;
        self
    }

    /// Only the primary mouse button starts a gesture; touch and pen always do.
    pub fn is_primary(&self) -> bool {
        self.kind != PointerKind::Mouse || self.button == 0
    }
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown(PointerInput),
    PointerMove(PointerInput),
    PointerUp(PointerInput),
    /// The platform took the pointer away; ends the gesture like a release.
    PointerCancel(PointerInput),
    Wheel { delta_y: f64, modifiers: Modifiers },
    /// `KeyboardEvent.key` with its modifiers.
    Key { key: String, modifiers: Modifiers },
    /// The inline label input was confirmed (Enter or blur).
    LabelCommit { text: String },
    LabelCancel,
}

impl InputEvent {
    pub fn key(key: &str, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_primary_mouse_button_counts() {
        assert!(PointerInput::mouse(1, 0.0, 0.0).is_primary());
        assert!(!PointerInput::mouse(1, 0.0, 0.0).with_button(2).is_primary());
        assert!(PointerInput::touch(7, 0.0, 0.0).with_button(-1).is_primary());
    }

    #[test]
    fn pointer_kind_names() {
        assert_eq!(PointerKind::from_name("mouse"), PointerKind::Mouse);
        assert_eq!(PointerKind::from_name("pen"), PointerKind::Pen);
        assert_eq!(PointerKind::from_name("touch"), PointerKind::Touch);
        assert_eq!(PointerKind::from_name(""), PointerKind::Touch);
    }

    #[test]
    fn cmd_is_ctrl_or_meta() {
        assert!(Modifiers::CTRL.cmd());
        assert!(Modifiers { meta: true, ..Modifiers::NONE }.cmd());
        assert!(!Modifiers { shift: true, ..Modifiers::NONE }.cmd());
    }
}

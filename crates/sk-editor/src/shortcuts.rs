//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. Ctrl and ⌘
//! are interchangeable.

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
    Save,
    /// Clear the canvas (after confirmation).
    Clear,
    /// Switch between the measure tool and the previous tool.
    ToggleMeasure,
    /// Escape: abandon the current measurement drag or label edit.
    Cancel,
    /// Enter: commit the label edit.
    Confirm,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Escape"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        if modifiers.cmd() && modifiers.shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if modifiers.cmd() {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "s" | "S" => Some(ShortcutAction::Save),
                "c" | "C" => Some(ShortcutAction::Clear),
                "m" | "M" => Some(ShortcutAction::ToggleMeasure),
                _ => None,
            };
        }

        match key {
            "Escape" => Some(ShortcutAction::Cancel),
            "Enter" => Some(ShortcutAction::Confirm),
            _ => None,
        }
    }
}

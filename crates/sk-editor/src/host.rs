//! The embedding host: notifications, confirmation dialogs, and the
//! record the saved sketch is written into.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Danger,
}

impl NoticeLevel {
    pub fn name(self) -> &'static str {
        match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "success",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Danger => "danger",
        }
    }
}

/// A user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Danger, message)
    }
}

/// Services the surrounding page provides to the editor.
pub trait Host {
    fn notify(&mut self, notice: Notice);

    /// Ask the user a yes/no question. `false` aborts the action.
    fn confirm(&mut self, message: &str) -> bool;

    /// Write `value` into the record field `field`.
    fn update_record(&mut self, field: &str, value: &str) -> Result<(), String>;
}

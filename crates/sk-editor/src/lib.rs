pub mod history;
pub mod host;
pub mod input;
pub mod lifecycle;
pub mod measure;
pub mod persist;
pub mod router;
pub mod shortcuts;
pub mod stroke;
pub mod tools;

pub use history::HistoryStack;
pub use host::{Host, Notice, NoticeLevel};
pub use input::{InputEvent, Modifiers, PointerInput, PointerKind};
pub use router::{InputRouter, Response, RouterState};
pub use tools::ToolKind;

use sk_render::RenderError;

/// Editor-level failures. All of them are recoverable; the router logs
/// them or turns them into host notices.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("measurement record: {0}")]
    SideCar(String),
    #[error("record update failed: {0}")]
    Persist(String),
}

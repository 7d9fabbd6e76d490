use crate::state::{BusyKind, Role};

/// Render-ready snapshot handed to the external view layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub chat: ChatView,
    pub batch: BatchView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatView {
    pub transcript: Vec<TurnView>,
    pub pending_query: String,
    /// Staged file names joined with `", "` for the upload area.
    pub staged_names: String,
    pub upload_status: String,
    pub notice: String,
    pub busy: Option<BusyKind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnView {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchView {
    pub file_names: Vec<String>,
    pub prompt: String,
    pub status_line: String,
    pub busy: bool,
    pub archive_filename: Option<String>,
}
